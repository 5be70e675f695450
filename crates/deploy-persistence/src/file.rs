//! Historial en archivos JSON: `<dir>/<network>/<Name>.json`.
//!
//! Un archivo por artifact, escrito de forma atómica (`.tmp` + rename) para
//! que una interrupción nunca deje un registro a medias. Un historial vacío
//! equivale a un directorio inexistente.
use std::fs;
use std::path::{Path, PathBuf};

use deploy_core::{History, HistoryError, HistoryStore, PublishedRecord};
use log::debug;

use crate::error::PersistenceError;

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct JsonFileHistoryStore {
    dir: PathBuf,
}

impl JsonFileHistoryStore {
    pub fn new(root: impl AsRef<Path>, network: &str) -> Self {
        Self { dir: root.as_ref().join(network) }
    }

    /// Directorio de la red (puede no existir todavía).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !name.is_empty()
                    && !name.starts_with('.')
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(PersistenceError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.{EXTENSION}")))
    }

    fn read_record(path: &Path, expected: &str) -> Result<PublishedRecord, PersistenceError> {
        let contents = fs::read_to_string(path)?;
        let record: PublishedRecord =
            serde_json::from_str(&contents).map_err(|e| PersistenceError::Corrupt { name: expected.to_string(),
                                                                                    reason: e.to_string() })?;
        if record.name != expected {
            return Err(PersistenceError::Corrupt { name: expected.to_string(),
                                                   reason: format!("file holds record for `{}`", record.name) });
        }
        Ok(record)
    }

    pub fn load_records(&self) -> Result<History, PersistenceError> {
        let mut history = History::new();
        if !self.dir.exists() {
            return Ok(history);
        }
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let record = Self::read_record(&path, name)?;
            history.insert(record.name.clone(), record);
        }
        debug!("file_history:load dir={} records={}", self.dir.display(), history.len());
        Ok(history)
    }

    pub fn read(&self, name: &str) -> Result<Option<PublishedRecord>, PersistenceError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(None);
        }
        Self::read_record(&path, name).map(Some)
    }

    pub fn write(&self, record: &PublishedRecord) -> Result<(), PersistenceError> {
        let path = self.path_for(&record.name)?;
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(record)?;
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        debug!("file_history:write artifact={} path={}", record.name, path.display());
        Ok(())
    }
}

impl HistoryStore for JsonFileHistoryStore {
    fn load(&self) -> Result<History, HistoryError> {
        Ok(self.load_records()?)
    }

    fn get(&self, name: &str) -> Result<Option<PublishedRecord>, HistoryError> {
        Ok(self.read(name)?)
    }

    fn record(&mut self, record: &PublishedRecord) -> Result<(), HistoryError> {
        Ok(self.write(record)?)
    }
}
