use thiserror::Error;

use crate::model::{History, PublishedRecord, RunState};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum HistoryError {
    #[error("history backend error: {0}")]
    Backend(String),
    #[error("corrupt history entry `{name}`: {reason}")]
    Corrupt { name: String, reason: String },
}

/// Almacén durable de publicaciones de UNA red.
///
/// Contrato:
/// - `load` se lee al inicio del run.
/// - `record` se invoca tras cada publicación exitosa y tras cada cambio de
///   `verified`, para sobrevivir a interrupciones a mitad de run.
/// - `save` persiste el `RunState` completo al final del run.
pub trait HistoryStore: Send {
    fn load(&self) -> Result<History, HistoryError>;

    fn get(&self, name: &str) -> Result<Option<PublishedRecord>, HistoryError> {
        Ok(self.load()?.remove(name))
    }

    fn record(&mut self, record: &PublishedRecord) -> Result<(), HistoryError>;

    fn save(&mut self, state: &RunState) -> Result<(), HistoryError> {
        for r in state.records() {
            self.record(r)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryHistoryStore {
    inner: History,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: History) -> Self {
        Self { inner: history }
    }

    pub fn history(&self) -> &History {
        &self.inner
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn load(&self) -> Result<History, HistoryError> {
        Ok(self.inner.clone())
    }

    fn get(&self, name: &str) -> Result<Option<PublishedRecord>, HistoryError> {
        Ok(self.inner.get(name).cloned())
    }

    fn record(&mut self, record: &PublishedRecord) -> Result<(), HistoryError> {
        self.inner.insert(record.name.clone(), record.clone());
        Ok(())
    }
}
