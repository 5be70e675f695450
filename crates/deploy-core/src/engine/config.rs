use serde::{Deserialize, Serialize};

use crate::verify::RetryPolicy;

/// Qué hacer con un artifact que ya tiene registro en el historial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipPolicy {
    /// Reutilizar siempre el registro existente.
    #[default]
    SkipExisting,
    /// Reutilizar sólo si las entradas resueltas coinciden con las
    /// registradas; si cambiaron, publicar de nuevo y reemplazar el registro.
    RedeployChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub skip_policy: SkipPolicy,
    /// Reintentar la verificación de registros reutilizados aún no verificados.
    pub verify_reused: bool,
    pub retry: RetryPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { skip_policy: SkipPolicy::default(),
               verify_reused: true,
               retry: RetryPolicy::default() }
    }
}
