//! Constantes del motor de despliegue.
//!
//! Los valores de este módulo participan en el cálculo de fingerprints y de
//! direcciones deterministas. Cambiarlos altera la reproducibilidad de las
//! ejecuciones, por eso se versionan de forma explícita.

/// Versión lógica del orquestador. Se incluye en el fingerprint de cada run
/// para que un cambio incompatible del motor no colisione con runs previos.
pub const ENGINE_VERSION: &str = "D1.0";

/// Prefijo del preimage usado al derivar direcciones (estilo CREATE2).
pub const CREATE2_PREFIX: u8 = 0xff;

/// Rol de la cuenta que firma y envía cada publicación.
pub const DEPLOYER_ROLE: &str = "deployer";
