//! Salt determinista: mismo `(name, salt_seed)` => misma salt, en cualquier
//! proceso y en cualquier momento.

use serde_json::json;

use crate::hashing::{sha256_hex, to_canonical_json};

/// SHA-256 (hex) de la codificación canónica de `[name, salt_seed]`.
pub fn deterministic_salt(name: &str, salt_seed: &str) -> String {
    sha256_hex(&to_canonical_json(&json!([name, salt_seed])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salt_is_stable_and_unambiguous() {
        assert_eq!(deterministic_salt("ERC20Mock", "ERC20Mock"), deterministic_salt("ERC20Mock", "ERC20Mock"));
        assert_eq!(deterministic_salt("A", "x").len(), 64);
        // Sin separador ambiguo: ("ab", "c") != ("a", "bc").
        assert_ne!(deterministic_salt("ab", "c"), deterministic_salt("a", "bc"));
    }
}
