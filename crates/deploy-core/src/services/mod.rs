//! Colaboradores externos que el orquestador invoca.
//!
//! Son fronteras de I/O opacas: el ledger (publicación firmada), el servicio
//! de verificación y el almacén de historial. El core sólo define los
//! contratos; las implementaciones viven en `deploy-adapters` y
//! `deploy-persistence`.

mod history;
mod publisher;
mod verifier;

pub use history::{HistoryError, HistoryStore, InMemoryHistoryStore};
pub use publisher::{LedgerPublisher, PublishError, PublishReceipt, PublishRequest};
pub use verifier::{VerificationOutcome, VerificationRequest, VerificationService};
