//! Verificadores locales.
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use deploy_core::{Address, VerificationOutcome, VerificationRequest, VerificationService};
use log::debug;
use tokio::sync::Mutex;

use crate::ledger::SimulatedLedger;

#[derive(Debug, Default)]
struct Script {
    queued: BTreeMap<String, VecDeque<VerificationOutcome>>,
    calls: Vec<VerificationRequest>,
}

/// Devuelve respuestas guionadas por artifact; agotado el guion (o sin
/// guion) responde `fallback`.
#[derive(Debug)]
pub struct ScriptedVerifier {
    fallback: VerificationOutcome,
    script: Mutex<Script>,
}

impl Default for ScriptedVerifier {
    fn default() -> Self {
        Self::new(VerificationOutcome::Verified)
    }
}

impl ScriptedVerifier {
    pub fn new(fallback: VerificationOutcome) -> Self {
        Self { fallback,
               script: Mutex::new(Script::default()) }
    }

    pub fn always_verified() -> Self {
        Self::default()
    }

    pub fn script<I>(mut self, artifact: impl Into<String>, outcomes: I) -> Self
        where I: IntoIterator<Item = VerificationOutcome>
    {
        self.script.get_mut().queued.entry(artifact.into()).or_default().extend(outcomes);
        self
    }

    pub async fn calls(&self) -> Vec<VerificationRequest> {
        self.script.lock().await.calls.clone()
    }

    pub async fn calls_for(&self, artifact: &str) -> usize {
        self.script.lock().await.calls.iter().filter(|c| c.artifact == artifact).count()
    }
}

#[async_trait]
impl VerificationService for ScriptedVerifier {
    async fn verify(&self, request: &VerificationRequest) -> VerificationOutcome {
        let mut script = self.script.lock().await;
        script.calls.push(request.clone());
        script.queued
              .get_mut(&request.artifact)
              .and_then(VecDeque::pop_front)
              .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Explorador simulado sobre un `SimulatedLedger` compartido.
///
/// Verifica si hay código en la ubicación y si argumentos y enlaces
/// coinciden con los usados al desplegar. Una segunda verificación de la
/// misma dirección responde `AlreadyVerified`.
#[derive(Debug)]
pub struct ExplorerSimulator {
    ledger: Arc<SimulatedLedger>,
    verified: Mutex<BTreeSet<Address>>,
}

impl ExplorerSimulator {
    pub fn new(ledger: Arc<SimulatedLedger>) -> Self {
        Self { ledger,
               verified: Mutex::new(BTreeSet::new()) }
    }

    pub async fn is_verified(&self, location: &Address) -> bool {
        self.verified.lock().await.contains(location)
    }
}

#[async_trait]
impl VerificationService for ExplorerSimulator {
    async fn verify(&self, request: &VerificationRequest) -> VerificationOutcome {
        let Some(deployed) = self.ledger.code_at(&request.location).await else {
            return VerificationOutcome::PermanentError(format!("no code at {}", request.location));
        };
        if deployed.constructor_args != request.constructor_args {
            return VerificationOutcome::PermanentError("constructor arguments do not match deployed code".into());
        }
        if deployed.libraries != request.libraries {
            return VerificationOutcome::PermanentError("library links do not match deployed code".into());
        }
        let mut verified = self.verified.lock().await;
        if !verified.insert(request.location.clone()) {
            return VerificationOutcome::AlreadyVerified;
        }
        debug!("explorer:verified artifact={} location={}", request.artifact, request.location);
        VerificationOutcome::Verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploy_core::{LedgerPublisher, LibraryBindings, PublishRequest};
    use serde_json::json;

    fn request(location: &Address, args: Vec<serde_json::Value>) -> VerificationRequest {
        VerificationRequest { artifact: "A".into(),
                              location: location.clone(),
                              constructor_args: args,
                              libraries: LibraryBindings::new() }
    }

    #[tokio::test]
    async fn scripted_outcomes_are_consumed_in_order() {
        let verifier = ScriptedVerifier::always_verified().script("A",
                                                                  [VerificationOutcome::TransientError("busy".into())]);
        let loc = Address::from_bytes(&[1; 20]);
        assert_eq!(verifier.verify(&request(&loc, vec![])).await,
                   VerificationOutcome::TransientError("busy".into()));
        assert_eq!(verifier.verify(&request(&loc, vec![])).await, VerificationOutcome::Verified);
        assert_eq!(verifier.calls_for("A").await, 2);
    }

    #[tokio::test]
    async fn explorer_checks_code_and_arguments() {
        let ledger = Arc::new(SimulatedLedger::new());
        let loc = Address::from_bytes(&[7; 20]);
        ledger.publish(&PublishRequest { artifact: "A".into(),
                                         bytecode_ref: "A".into(),
                                         constructor_args: vec![json!(1)],
                                         libraries: LibraryBindings::new(),
                                         from: Address::from_bytes(&[0xde; 20]),
                                         salt: "s".into(),
                                         expected_location: loc.clone() })
              .await
              .expect("publish");
        let explorer = ExplorerSimulator::new(ledger);

        let unknown = Address::from_bytes(&[8; 20]);
        assert!(matches!(explorer.verify(&request(&unknown, vec![json!(1)])).await,
                         VerificationOutcome::PermanentError(_)));
        assert!(matches!(explorer.verify(&request(&loc, vec![json!(2)])).await,
                         VerificationOutcome::PermanentError(_)));
        assert_eq!(explorer.verify(&request(&loc, vec![json!(1)])).await, VerificationOutcome::Verified);
        assert_eq!(explorer.verify(&request(&loc, vec![json!(1)])).await,
                   VerificationOutcome::AlreadyVerified);
        assert!(explorer.is_verified(&loc).await);
    }
}
