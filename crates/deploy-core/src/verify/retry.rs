use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Política de reintentos para errores transitorios de verificación.
///
/// El retardo antes del intento `n + 1` es
/// `min(initial_delay * 2^(n - 1), max_delay)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3,
               initial_delay: Duration::from_millis(500),
               max_delay: Duration::from_secs(8) }
    }
}

impl RetryPolicy {
    /// Sin esperas entre intentos (tests y simulación local).
    pub fn immediate(max_attempts: u32) -> Self {
        Self { max_attempts,
               initial_delay: Duration::ZERO,
               max_delay: Duration::ZERO }
    }

    /// Retardo a aplicar tras el intento fallido número `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let multiplier = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(multiplier).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_until_capped() {
        let p = RetryPolicy { max_attempts: 10,
                              initial_delay: Duration::from_millis(100),
                              max_delay: Duration::from_millis(500) };
        assert_eq!(p.delay_after(1), Duration::from_millis(100));
        assert_eq!(p.delay_after(2), Duration::from_millis(200));
        assert_eq!(p.delay_after(3), Duration::from_millis(400));
        assert_eq!(p.delay_after(4), Duration::from_millis(500));
        assert_eq!(p.delay_after(40), Duration::from_millis(500));
    }
}
