//! Registro de una publicación y estado en memoria de un run.
//!
//! Un `PublishedRecord` se crea la primera vez que un artifact se publica y
//! es inmutable salvo por `verified`, que sólo puede pasar de `false` a
//! `true`. `RunState` agrega los registros del historial más los producidos
//! durante el run, en el orden en que se incorporan.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Address;

/// Enlaces de librería: rol -> ubicación publicada.
pub type LibraryBindings = BTreeMap<String, Address>;

/// Historial persistido: nombre de artifact -> registro.
pub type History = BTreeMap<String, PublishedRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedRecord {
    pub name: String,
    pub location: Address,
    pub bytecode_ref: String,
    pub constructor_args_used: Vec<Value>,
    pub libraries_used: LibraryBindings,
    pub salt: String,
    pub transaction_ref: Option<String>,
    pub published_at: DateTime<Utc>, // metadato (no entra en fingerprint)
    pub verified: bool,
}

impl PublishedRecord {
    /// Única mutación permitida sobre un registro existente.
    pub fn mark_verified(&mut self) {
        self.verified = true;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    records: IndexMap<String, PublishedRecord>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_history(history: History) -> Self {
        Self { records: history.into_iter().collect() }
    }

    pub fn get(&self, name: &str) -> Option<&PublishedRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Inserta (o reemplaza) el registro de `record.name`.
    pub fn insert(&mut self, record: PublishedRecord) {
        self.records.insert(record.name.clone(), record);
    }

    /// Marca como verificado y devuelve el registro actualizado.
    pub fn mark_verified(&mut self, name: &str) -> Option<&PublishedRecord> {
        let rec = self.records.get_mut(name)?;
        rec.mark_verified();
        Some(rec)
    }

    pub fn records(&self) -> impl Iterator<Item = &PublishedRecord> {
        self.records.values()
    }

    /// Ubicaciones conocidas: nombre -> dirección.
    pub fn locations(&self) -> BTreeMap<String, Address> {
        self.records.iter().map(|(k, r)| (k.clone(), r.location.clone())).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_history(self) -> History {
        self.records.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, byte: u8) -> PublishedRecord {
        PublishedRecord { name: name.to_string(),
                          location: Address::from_bytes(&[byte; 20]),
                          bytecode_ref: name.to_string(),
                          constructor_args_used: vec![],
                          libraries_used: LibraryBindings::new(),
                          salt: String::new(),
                          transaction_ref: None,
                          published_at: Utc::now(),
                          verified: false }
    }

    #[test]
    fn run_state_keeps_insertion_order_and_flips_verified() {
        let mut state = RunState::new();
        state.insert(record("B", 2));
        state.insert(record("A", 1));
        let names: Vec<&str> = state.records().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);

        assert!(state.mark_verified("A").is_some_and(|r| r.verified));
        assert!(state.mark_verified("missing").is_none());
        assert_eq!(state.locations().get("B"), Some(&Address::from_bytes(&[2; 20])));
    }

    #[test]
    fn history_round_trips_through_run_state() {
        let mut history = History::new();
        history.insert("A".into(), record("A", 1));
        let state = RunState::from_history(history.clone());
        assert_eq!(state.into_history(), history);
    }
}
