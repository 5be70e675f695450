//! Errores del core de despliegue.
//!
//! Taxonomía:
//! - `RegistryError`: errores de construcción del registro (antes de cualquier run).
//! - `ResolveError`: fallos del resolver al preparar entradas de un artifact.
//! - `DeployError`: errores que detienen un run del orquestador.
//!
//! Los fallos de verificación NO aparecen aquí: nunca abortan un run (ver
//! `verify::VerificationReport`).

use thiserror::Error;
use uuid::Uuid;

use crate::model::PublishedRecord;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RegistryError {
    #[error("dependency cycle detected among: {}", involved.join(", "))]
    CycleDetected { involved: Vec<String> },
    #[error("artifact `{artifact}` depends on unknown artifact `{dependency}`")]
    UnknownDependency { artifact: String, dependency: String },
    #[error("artifact `{0}` registered twice")]
    DuplicateArtifact(String),
    #[error("no artifact carries tag `{0}`")]
    UnknownTag(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ResolveError {
    #[error("artifact `{artifact}` requires `{dependency}` which has no published location")]
    UnresolvedDependency { artifact: String, dependency: String },
    #[error("named account `{role}` is not configured for network `{network}`")]
    MissingNamedAccount { role: String, network: String },
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DeployError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("named account `{role}` is not configured for network `{network}`")]
    MissingNamedAccount { role: String, network: String },
    /// Violación de invariante: el orquestador intentó resolver un artifact
    /// antes que sus dependencias. Indica un defecto, no un input inválido.
    #[error("internal invariant violated: `{artifact}` reached before dependency `{dependency}`")]
    UnresolvedDependency { artifact: String, dependency: String },
    #[error("run {run_id}: publishing `{artifact}` failed: {reason} (earlier artifacts stay published and will be reused)")]
    PublishFailed { run_id: Uuid, artifact: String, reason: String },
    #[error("history store unavailable: {0}")]
    HistoryLoadFailed(String),
    /// El artifact quedó en el ledger pero no en el historial. `record` lleva
    /// ubicación y transacción para poder persistirlo a mano.
    #[error("`{artifact}` was published at {} but could not be recorded: {reason}", .record.location)]
    HistoryWriteFailed { artifact: String, reason: String, record: Box<PublishedRecord> },
}

impl From<ResolveError> for DeployError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::UnresolvedDependency { artifact, dependency } => {
                Self::UnresolvedDependency { artifact, dependency }
            }
            ResolveError::MissingNamedAccount { role, network } => Self::MissingNamedAccount { role, network },
        }
    }
}
