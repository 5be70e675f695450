//! Hash helpers: abstracción para no acoplar el resto del core a un algoritmo.
//!
//! - BLAKE3 para fingerprints y derivación de direcciones.
//! - SHA-256 para la salt determinista (equivalente al `id(name)` de las
//!   herramientas de despliegue habituales, pero sin depender de keccak).

use blake3::Hasher;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::to_canonical_json;

/// Hashea un string y devuelve hex (64 caracteres).
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Hash BLAKE3 del JSON canónico de `value`.
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}

/// Digest BLAKE3 crudo de la concatenación de `parts`.
pub fn blake3_digest(parts: &[&[u8]]) -> [u8; 32] {
    let mut h = Hasher::new();
    for p in parts {
        h.update(p);
    }
    *h.finalize().as_bytes()
}

/// SHA-256 de `input` en hex minúsculas.
pub fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
