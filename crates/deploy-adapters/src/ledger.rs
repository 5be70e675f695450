//! Ledger simulado en memoria.
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use deploy_core::hashing::hash_value;
use deploy_core::{Address, LedgerPublisher, PublishError, PublishReceipt, PublishRequest, PublishedRecord};
use log::debug;
use serde_json::json;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct LedgerState {
    /// Código desplegado por dirección.
    deployed: BTreeMap<Address, PublishRequest>,
    /// Todas las llamadas a `publish`, exitosas o no, en orden.
    calls: Vec<PublishRequest>,
    failing: BTreeSet<String>,
    relocations: BTreeMap<String, Address>,
    nonce: u64,
}

#[derive(Debug, Default)]
pub struct SimulatedLedger {
    state: Mutex<LedgerState>,
}

impl SimulatedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger que ya contiene el código de `records`, tal como lo dejaron
    /// runs anteriores.
    pub fn seeded<'a, I>(mut self, records: I, from: &Address) -> Self
        where I: IntoIterator<Item = &'a PublishedRecord>
    {
        let state = self.state.get_mut();
        for r in records {
            state.deployed.insert(r.location.clone(),
                                  PublishRequest { artifact: r.name.clone(),
                                                   bytecode_ref: r.bytecode_ref.clone(),
                                                   constructor_args: r.constructor_args_used.clone(),
                                                   libraries: r.libraries_used.clone(),
                                                   from: from.clone(),
                                                   salt: r.salt.clone(),
                                                   expected_location: r.location.clone() });
        }
        self
    }

    /// Toda publicación de `artifact` fallará hasta `set_failing(.., false)`.
    pub fn failing_on(mut self, artifact: impl Into<String>) -> Self {
        self.state.get_mut().failing.insert(artifact.into());
        self
    }

    /// Despliega `artifact` en `location` en vez de la dirección esperada.
    pub fn relocating(mut self, artifact: impl Into<String>, location: Address) -> Self {
        self.state.get_mut().relocations.insert(artifact.into(), location);
        self
    }

    pub async fn set_failing(&self, artifact: &str, failing: bool) {
        let mut state = self.state.lock().await;
        if failing {
            state.failing.insert(artifact.to_string());
        } else {
            state.failing.remove(artifact);
        }
    }

    pub async fn calls(&self) -> Vec<PublishRequest> {
        self.state.lock().await.calls.clone()
    }

    pub async fn publish_count(&self) -> usize {
        self.state.lock().await.calls.len()
    }

    pub async fn publish_count_for(&self, artifact: &str) -> usize {
        self.state.lock().await.calls.iter().filter(|c| c.artifact == artifact).count()
    }

    /// Request con el que se desplegó el código en `location`, si hay código.
    pub async fn code_at(&self, location: &Address) -> Option<PublishRequest> {
        self.state.lock().await.deployed.get(location).cloned()
    }

    pub async fn deployed_count(&self) -> usize {
        self.state.lock().await.deployed.len()
    }
}

#[async_trait]
impl LedgerPublisher for SimulatedLedger {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, PublishError> {
        let mut state = self.state.lock().await;
        state.calls.push(request.clone());
        if state.failing.contains(&request.artifact) {
            return Err(PublishError(format!("simulated failure publishing {}", request.artifact)));
        }
        let location = state.relocations
                            .get(&request.artifact)
                            .cloned()
                            .unwrap_or_else(|| request.expected_location.clone());
        if state.deployed.contains_key(&location) {
            return Err(PublishError(format!("address {location} already holds code")));
        }
        state.nonce += 1;
        let transaction_ref = format!("0x{}",
                                      hash_value(&json!({
                                                     "artifact": request.artifact,
                                                     "salt": request.salt,
                                                     "location": location.as_str(),
                                                     "nonce": state.nonce,
                                                 })));
        debug!("ledger:publish artifact={} location={location} tx={transaction_ref}", request.artifact);
        state.deployed.insert(location.clone(), request.clone());
        Ok(PublishReceipt { location, transaction_ref })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploy_core::LibraryBindings;

    fn request(name: &str, byte: u8) -> PublishRequest {
        PublishRequest { artifact: name.to_string(),
                         bytecode_ref: name.to_string(),
                         constructor_args: vec![],
                         libraries: LibraryBindings::new(),
                         from: Address::from_bytes(&[0xde; 20]),
                         salt: "s".to_string(),
                         expected_location: Address::from_bytes(&[byte; 20]) }
    }

    #[tokio::test]
    async fn publishes_at_expected_location_and_rejects_collisions() {
        let ledger = SimulatedLedger::new();
        let receipt = ledger.publish(&request("A", 1)).await.expect("publish");
        assert_eq!(receipt.location, Address::from_bytes(&[1; 20]));
        assert!(receipt.transaction_ref.starts_with("0x"));

        let err = ledger.publish(&request("A", 1)).await.unwrap_err();
        assert!(err.0.contains("already holds code"));
        assert_eq!(ledger.publish_count().await, 2);
        assert_eq!(ledger.deployed_count().await, 1);
    }

    #[tokio::test]
    async fn failing_artifacts_can_be_toggled() {
        let ledger = SimulatedLedger::new().failing_on("A");
        assert!(ledger.publish(&request("A", 1)).await.is_err());
        ledger.set_failing("A", false).await;
        assert!(ledger.publish(&request("A", 1)).await.is_ok());
    }

    #[tokio::test]
    async fn seeded_code_occupies_recorded_locations() {
        let record = PublishedRecord { name: "A".into(),
                                       location: Address::from_bytes(&[3; 20]),
                                       bytecode_ref: "A".into(),
                                       constructor_args_used: vec![json!(1)],
                                       libraries_used: LibraryBindings::new(),
                                       salt: "s".into(),
                                       transaction_ref: None,
                                       published_at: chrono::Utc::now(),
                                       verified: false };
        let ledger = SimulatedLedger::new().seeded([&record], &Address::from_bytes(&[0xde; 20]));
        let code = ledger.code_at(&record.location).await.expect("seeded code");
        assert_eq!(code.constructor_args, vec![json!(1)]);
        assert_eq!(ledger.publish_count().await, 0);

        let err = ledger.publish(&request("A", 3)).await.unwrap_err();
        assert!(err.0.contains("already holds code"));
    }

    #[tokio::test]
    async fn relocation_overrides_expected_location() {
        let elsewhere = Address::from_bytes(&[9; 20]);
        let ledger = SimulatedLedger::new().relocating("A", elsewhere.clone());
        let receipt = ledger.publish(&request("A", 1)).await.expect("publish");
        assert_eq!(receipt.location, elsewhere);
        assert!(ledger.code_at(&elsewhere).await.is_some());
    }
}
