use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Address, LibraryBindings, PublishedRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub artifact: String,
    pub location: Address,
    pub constructor_args: Vec<Value>,
    pub libraries: LibraryBindings,
}

impl VerificationRequest {
    pub fn for_record(record: &PublishedRecord) -> Self {
        Self { artifact: record.name.clone(),
               location: record.location.clone(),
               constructor_args: record.constructor_args_used.clone(),
               libraries: record.libraries_used.clone() }
    }
}

/// Respuesta del servicio de verificación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationOutcome {
    Verified,
    AlreadyVerified,
    /// Fallo de red/servicio: se puede reintentar.
    TransientError(String),
    /// Rechazo definitivo (p. ej. bytecode que no coincide): no se reintenta.
    PermanentError(String),
}

#[async_trait]
pub trait VerificationService: Send + Sync {
    async fn verify(&self, request: &VerificationRequest) -> VerificationOutcome;
}

#[async_trait]
impl<T: VerificationService + ?Sized> VerificationService for Arc<T> {
    async fn verify(&self, request: &VerificationRequest) -> VerificationOutcome {
        (**self).verify(request).await
    }
}
