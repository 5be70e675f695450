//! Historial en Postgres (Diesel + r2d2).
//!
//! - Una fila por `(network, name)` en `published_records`.
//! - `record` es un upsert: la primera publicación inserta, los cambios de
//!   `verified` actualizan la misma fila.
//! - Errores transitorios se reintentan con backoff corto (`with_retry`).

use chrono::{DateTime, Utc};
use deploy_core::{Address, History, HistoryError, HistoryStore, LibraryBindings, PublishedRecord};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use log::{debug, warn};
use serde_json::Value;

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::published_records;

/// Pool r2d2 de conexiones Postgres.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones (pool real o fake en tests).
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError>;
}

pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = published_records)]
pub struct RecordRow {
    pub network: String,
    pub name: String,
    pub location: String,
    pub bytecode_ref: String,
    pub constructor_args: Value,
    pub libraries: Value,
    pub salt: String,
    pub transaction_ref: Option<String>,
    pub published_at: DateTime<Utc>,
    pub verified: bool,
}

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = published_records)]
pub struct NewRecordRow<'a> {
    pub network: &'a str,
    pub name: &'a str,
    pub location: &'a str,
    pub bytecode_ref: &'a str,
    pub constructor_args: Value,
    pub libraries: Value,
    pub salt: &'a str,
    pub transaction_ref: Option<&'a str>,
    pub published_at: DateTime<Utc>,
    pub verified: bool,
}

impl<'a> NewRecordRow<'a> {
    fn from_record(network: &'a str, record: &'a PublishedRecord) -> Result<Self, PersistenceError> {
        Ok(Self { network,
                  name: &record.name,
                  location: record.location.as_str(),
                  bytecode_ref: &record.bytecode_ref,
                  constructor_args: serde_json::to_value(&record.constructor_args_used)?,
                  libraries: serde_json::to_value(&record.libraries_used)?,
                  salt: &record.salt,
                  transaction_ref: record.transaction_ref.as_deref(),
                  published_at: record.published_at,
                  verified: record.verified })
    }
}

impl TryFrom<RecordRow> for PublishedRecord {
    type Error = PersistenceError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| PersistenceError::Corrupt { name: row.name.clone(),
                                                                    reason };
        let location = Address::parse(&row.location).map_err(|e| corrupt(e.to_string()))?;
        let constructor_args_used: Vec<Value> =
            serde_json::from_value(row.constructor_args.clone()).map_err(|e| corrupt(format!("constructor_args: {e}")))?;
        let libraries_used: LibraryBindings =
            serde_json::from_value(row.libraries.clone()).map_err(|e| corrupt(format!("libraries: {e}")))?;
        Ok(PublishedRecord { name: row.name,
                             location,
                             bytecode_ref: row.bytecode_ref,
                             constructor_args_used,
                             libraries_used,
                             salt: row.salt,
                             transaction_ref: row.transaction_ref,
                             published_at: row.published_at,
                             verified: row.verified })
    }
}

fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::SerializationConflict | PersistenceError::TransientIo(_) => true,
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("deadlock detected")
            || m.contains("connection closed")
            || m.contains("connection refused")
            || m.contains("timeout")
        }
        _ => false,
    }
}

/// Hasta 3 reintentos con backoff 15ms, 30ms, 45ms.
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms", attempts + 1, e, delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// `HistoryStore` sobre Postgres para una red.
pub struct PgHistoryStore<P: ConnectionProvider> {
    provider: P,
    network: String,
}

impl<P: ConnectionProvider> PgHistoryStore<P> {
    pub fn new(provider: P, network: impl Into<String>) -> Self {
        Self { provider,
               network: network.into() }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn load_records(&self) -> Result<History, PersistenceError> {
        let rows: Vec<RecordRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            Ok(published_records::table.filter(published_records::network.eq(&self.network))
                                       .order(published_records::name.asc())
                                       .select(RecordRow::as_select())
                                       .load(&mut conn)?)
        })?;
        debug!("pg_history:load network={} rows={}", self.network, rows.len());
        rows.into_iter()
            .map(|row| PublishedRecord::try_from(row).map(|r| (r.name.clone(), r)))
            .collect()
    }

    pub fn read(&self, name: &str) -> Result<Option<PublishedRecord>, PersistenceError> {
        let row: Option<RecordRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            Ok(published_records::table.filter(published_records::network.eq(&self.network))
                                       .filter(published_records::name.eq(name))
                                       .select(RecordRow::as_select())
                                       .first(&mut conn)
                                       .optional()?)
        })?;
        row.map(PublishedRecord::try_from).transpose()
    }

    pub fn upsert(&self, record: &PublishedRecord) -> Result<(), PersistenceError> {
        let row = NewRecordRow::from_record(&self.network, record)?;
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::insert_into(published_records::table).values(&row)
                                                         .on_conflict((published_records::network,
                                                                       published_records::name))
                                                         .do_update()
                                                         .set(&row)
                                                         .execute(&mut conn)?;
            Ok(())
        })?;
        debug!("pg_history:upsert network={} artifact={} verified={}",
               self.network,
               record.name,
               record.verified);
        Ok(())
    }
}

impl<P: ConnectionProvider> HistoryStore for PgHistoryStore<P> {
    fn load(&self) -> Result<History, HistoryError> {
        Ok(self.load_records()?)
    }

    fn get(&self, name: &str) -> Result<Option<PublishedRecord>, HistoryError> {
        Ok(self.read(name)?)
    }

    fn record(&mut self, record: &PublishedRecord) -> Result<(), HistoryError> {
        Ok(self.upsert(record)?)
    }
}

/// Construye el pool y corre las migraciones pendientes una vez.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let max_size = max_size.max(1);
    let min_size = min_size.clamp(1, max_size);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(min_size))
                                    .max_size(max_size)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Carga `.env`, lee `DbConfig` y construye un pool ya migrado.
pub fn build_pool_from_env() -> Result<PgPool, PersistenceError> {
    let cfg = crate::config::DbConfig::from_env()?;
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retried_then_surface() {
        let mut calls = 0;
        let result: Result<(), PersistenceError> = with_retry(|| {
            calls += 1;
            Err(PersistenceError::TransientIo("pool".into()))
        });
        assert!(result.is_err());
        assert_eq!(calls, 4);
    }

    #[test]
    fn permanent_errors_are_not_retried() {
        let mut calls = 0;
        let _ = with_retry::<_, ()>(|| {
            calls += 1;
            Err(PersistenceError::CheckViolation("location".into()))
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn row_with_bad_location_is_corrupt() {
        let row = RecordRow { network: "hardhat".into(),
                              name: "Token".into(),
                              location: "nope".into(),
                              bytecode_ref: "Token".into(),
                              constructor_args: Value::Array(vec![]),
                              libraries: Value::Object(Default::default()),
                              salt: "s".into(),
                              transaction_ref: None,
                              published_at: Utc::now(),
                              verified: false };
        assert!(matches!(PublishedRecord::try_from(row), Err(PersistenceError::Corrupt { .. })));
    }
}
