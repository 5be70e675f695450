//! deploy-core: orquestador determinista de despliegues en DAG.
pub mod accounts;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod registry;
pub mod resolver;
pub mod services;
pub mod verify;

pub use accounts::NamedAccounts;
pub use engine::{ArtifactAction, ArtifactOutcome, Orchestrator, OrchestratorBuilder, RunConfig, RunReport, SkipPolicy,
                 VerificationStatus};
pub use errors::{DeployError, RegistryError, ResolveError};
pub use event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use model::{Address, ArtifactSpec, ConstructorArg, History, LibraryBindings, PublishedRecord, RunState};
pub use registry::{Registry, RegistryBuilder};
pub use resolver::{compute_target_location, deterministic_salt, ResolvedInputs};
pub use services::{HistoryError, HistoryStore, InMemoryHistoryStore, LedgerPublisher, PublishError, PublishReceipt,
                   PublishRequest, VerificationOutcome, VerificationRequest, VerificationService};
pub use verify::{RetryPolicy, VerificationDispatcher, VerificationReport};
