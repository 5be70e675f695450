//! Error de nivel aplicación y su código de salida.
use deploy_core::{DeployError, RegistryError};
use deploy_persistence::PersistenceError;
use thiserror::Error;

use super::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("deploy error: {0}")]
    Deploy(#[from] DeployError),
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl AppError {
    /// 2 uso/configuración, 3 registro, 4 precondición, 5 publicación o
    /// persistencia.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Registry(_) | Self::Deploy(DeployError::Registry(_)) => 3,
            Self::Deploy(DeployError::MissingNamedAccount { .. }) => 4,
            Self::Deploy(_) | Self::Persistence(_) | Self::Output(_) => 5,
        }
    }
}
