use log::{info, warn};

use super::RetryPolicy;
use crate::model::PublishedRecord;
use crate::services::{VerificationOutcome, VerificationRequest, VerificationService};

/// Resultado de verificar un registro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub verified: bool,
    pub already_verified: bool,
    pub attempts: u32,
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub struct VerificationDispatcher<V> {
    service: V,
    policy: RetryPolicy,
}

impl<V: VerificationService> VerificationDispatcher<V> {
    pub fn new(service: V, policy: RetryPolicy) -> Self {
        Self { service, policy }
    }

    pub fn service(&self) -> &V {
        &self.service
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Verifica `record` con su ubicación, argumentos y enlaces.
    ///
    /// - `AlreadyVerified` cuenta como éxito.
    /// - `TransientError` se reintenta con backoff hasta `max_attempts`.
    /// - `PermanentError` termina de inmediato.
    pub async fn dispatch(&self, record: &PublishedRecord) -> VerificationReport {
        let request = VerificationRequest::for_record(record);
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.service.verify(&request).await {
                VerificationOutcome::Verified => {
                    info!("verify:ok artifact={} location={} attempts={attempts}", record.name, record.location);
                    return VerificationReport { verified: true,
                                                already_verified: false,
                                                attempts,
                                                last_error: None };
                }
                VerificationOutcome::AlreadyVerified => {
                    info!("verify:already artifact={} location={}", record.name, record.location);
                    return VerificationReport { verified: true,
                                                already_verified: true,
                                                attempts,
                                                last_error: None };
                }
                VerificationOutcome::PermanentError(e) => {
                    warn!("verify:permanent artifact={} err={e}", record.name);
                    return VerificationReport { verified: false,
                                                already_verified: false,
                                                attempts,
                                                last_error: Some(e) };
                }
                VerificationOutcome::TransientError(e) if attempts < max_attempts => {
                    let delay = self.policy.delay_after(attempts);
                    warn!("verify:retryable artifact={} (attempt {attempts}): {e} -> sleeping {}ms",
                          record.name,
                          delay.as_millis());
                    tokio::time::sleep(delay).await;
                }
                VerificationOutcome::TransientError(e) => {
                    warn!("verify:exhausted artifact={} after {attempts} attempts: {e}", record.name);
                    return VerificationReport { verified: false,
                                                already_verified: false,
                                                attempts,
                                                last_error: Some(e) };
                }
            }
        }
    }

    /// Proyección booleana de `dispatch`.
    pub async fn verify(&self, record: &PublishedRecord) -> bool {
        self.dispatch(record).await.verified
    }
}
