//! deployflow
//!
//! Orquestación determinista de despliegues en DAG:
//! - `config`: configuración desde entorno / `.env`.
//! - `networks`: redes conocidas y cuentas nombradas.
//! - `deployments`: registros incluidos (Crucible, mocks).
//! - `app`: casos de uso `deploy`, `plan`, `status`.
//! - `cli`: definición clap.
//! - `errors`: errores de aplicación y códigos de salida.

pub mod app;
pub mod cli;
pub mod config;
pub mod deployments;
pub mod errors;
pub mod networks;
