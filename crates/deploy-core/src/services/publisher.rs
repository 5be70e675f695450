use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{Address, LibraryBindings};

/// Todo lo que el ledger necesita para publicar un artifact.
///
/// Los enlaces de librería viajan por nombre de rol; cómo se "linkean" en el
/// bytecode es asunto del publicador.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub artifact: String,
    pub bytecode_ref: String,
    pub constructor_args: Vec<Value>,
    pub libraries: LibraryBindings,
    pub from: Address,
    pub salt: String,
    pub expected_location: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub location: Address,
    pub transaction_ref: String,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("{0}")]
pub struct PublishError(pub String);

/// Publicador del ledger. Siempre intenta una publicación real al ser
/// llamado; evitar duplicados es responsabilidad del orquestador.
#[async_trait]
pub trait LedgerPublisher: Send + Sync {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, PublishError>;
}

#[async_trait]
impl<T: LedgerPublisher + ?Sized> LedgerPublisher for Arc<T> {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, PublishError> {
        (**self).publish(request).await
    }
}
