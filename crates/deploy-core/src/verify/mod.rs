//! Despachador de verificación: operación auxiliar y best-effort.
//!
//! Nunca propaga errores al orquestador; sólo informa un
//! `VerificationReport` (o su proyección booleana).

mod dispatcher;
mod retry;

pub use dispatcher::{VerificationDispatcher, VerificationReport};
pub use retry::RetryPolicy;
