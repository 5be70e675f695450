//! deploy-adapters: implementaciones locales de los colaboradores del core.
//!
//! - `SimulatedLedger`: publicador en memoria que "despliega" en la
//!   dirección esperada y rechaza colisiones.
//! - `ExplorerSimulator`: verificador que contrasta contra el ledger
//!   simulado (código presente, argumentos y enlaces coincidentes).
//! - `ScriptedVerifier`: verificador guionado por artifact, para tests.
//!
//! Ninguno hace I/O de red; sirven para `deploy` en modo simulado y para
//! probar el orquestador de punta a punta.

pub mod ledger;
pub mod verifier;

pub use ledger::SimulatedLedger;
pub use verifier::{ExplorerSimulator, ScriptedVerifier};
