//! Tipos de evento del run y estructura `RunEvent`.
//!
//! Rol en el flujo:
//! - Cada ejecución del orquestador emite eventos a un `EventStore`
//!   append-only, identificados por `run_id`.
//! - El log de eventos es el reporte observable del run: qué se reutilizó,
//!   qué se publicó, qué falló y el resultado de cada verificación.
//! - El enum `RunEventKind` es el contrato estable del motor.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Address, LibraryBindings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Primer evento de un `run_id`: fija el DAG y la red.
    RunInitialized {
        registry_hash: String,
        artifact_count: usize,
        network: String,
    },
    /// Se reutilizó un registro previo. `stale` indica que sus entradas ya no
    /// coinciden con las que se resolverían hoy.
    Reused { name: String, location: Address, stale: bool },
    /// Publicación nueva, ya registrada en el historial.
    Published {
        name: String,
        location: Address,
        transaction_ref: String,
        libraries: LibraryBindings,
    },
    /// La publicación falló; el run se detiene aquí.
    Failed { name: String, error: String },
    VerificationSucceeded {
        name: String,
        attempts: u32,
        already_verified: bool,
    },
    /// Verificación fallida tras reintentos. No detiene el run.
    VerificationFailed { name: String, attempts: u32, error: String },
    /// Cierre con fingerprint agregado y cantidad de advertencias.
    RunCompleted { run_fingerprint: String, caveats: usize },
}

impl RunEventKind {
    /// Artifact al que se refiere el evento, si aplica.
    pub fn artifact(&self) -> Option<&str> {
        match self {
            Self::Reused { name, .. }
            | Self::Published { name, .. }
            | Self::Failed { name, .. }
            | Self::VerificationSucceeded { name, .. }
            | Self::VerificationFailed { name, .. } => Some(name),
            Self::RunInitialized { .. } | Self::RunCompleted { .. } => None,
        }
    }

    /// Nombre corto y estable de la variante (logs/persistencia).
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::RunInitialized { .. } => "RunInitialized",
            Self::Reused { .. } => "Reused",
            Self::Published { .. } => "Published",
            Self::Failed { .. } => "Failed",
            Self::VerificationSucceeded { .. } => "VerificationSucceeded",
            Self::VerificationFailed { .. } => "VerificationFailed",
            Self::RunCompleted { .. } => "RunCompleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // asignado por el EventStore (orden append)
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprint)
}
