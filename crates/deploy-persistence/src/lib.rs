//! deploy-persistence
//!
//! Backends durables para el historial de publicaciones (`HistoryStore`).
//!
//! Módulos:
//! - `file`: un JSON por artifact bajo `<dir>/<network>/`, escritura atómica.
//! - `pg`: tabla `published_records` en Postgres (Diesel + r2d2).
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: configuración de conexión desde `.env`.
//! - `schema`: tablas Diesel.

pub mod config;
pub mod error;
pub mod file;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use file::JsonFileHistoryStore;
pub use pg::{build_pool, build_pool_from_env, ConnectionProvider, PgHistoryStore, PgPool, PoolProvider};
