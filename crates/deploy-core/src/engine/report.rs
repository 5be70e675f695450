//! Reporte de un run completado.

use uuid::Uuid;

use crate::event::RunEvent;
use crate::model::{Address, RunState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactAction {
    Reused { stale: bool },
    Published { transaction_ref: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    Verified { attempts: u32, already_verified: bool },
    /// El historial ya lo tenía verificado; no se llamó al servicio.
    PreviouslyVerified,
    Failed { attempts: u32, error: String },
    /// Registro reutilizado sin verificar y `verify_reused = false`.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutcome {
    pub name: String,
    pub location: Address,
    pub action: ArtifactAction,
    pub verification: VerificationStatus,
}

impl ArtifactOutcome {
    /// Verificación fallida o registro reutilizado con entradas desactualizadas.
    pub fn has_caveat(&self) -> bool {
        matches!(self.verification, VerificationStatus::Failed { .. })
        || matches!(self.action, ArtifactAction::Reused { stale: true })
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub network: String,
    pub state: RunState,
    pub events: Vec<RunEvent>,
    /// Un resultado por artifact del registro, en orden topológico.
    pub outcomes: Vec<ArtifactOutcome>,
    pub fingerprint: String,
}

impl RunReport {
    pub fn published(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.action, ArtifactAction::Published { .. }))
            .map(|o| o.name.as_str())
    }

    pub fn reused(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.action, ArtifactAction::Reused { .. }))
            .map(|o| o.name.as_str())
    }

    pub fn caveats(&self) -> usize {
        self.outcomes.iter().filter(|o| o.has_caveat()).count()
    }

    /// Éxito sin advertencias.
    pub fn is_clean(&self) -> bool {
        self.caveats() == 0
    }

    pub fn outcome(&self, name: &str) -> Option<&ArtifactOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}
