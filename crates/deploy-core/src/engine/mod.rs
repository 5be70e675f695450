//! Engine module for the deployment orchestrator.
//!
//! Provides the orchestrator itself, its builder, the per-run configuration
//! and the report returned by a completed run.

pub mod builder;
pub mod config;
pub mod core;
pub mod report;

pub use builder::OrchestratorBuilder;
pub use config::{RunConfig, SkipPolicy};
pub use core::Orchestrator;
pub use report::{ArtifactAction, ArtifactOutcome, RunReport, VerificationStatus};
