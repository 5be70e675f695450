use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("invalid value for {key}: `{value}` ({reason})")]
    Invalid { key: String, value: String, reason: String },
    #[error("unknown network `{0}` (known: {known})", known = crate::networks::known_names().join(", "))]
    UnknownNetwork(String),
}

impl ConfigError {
    pub fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid { key: key.to_string(),
                        value: value.to_string(),
                        reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_variant_format() {
        let err = ConfigError::invalid("SKIP_POLICY", "sometimes", "expected skip-existing or redeploy-changed");
        assert_eq!(err.to_string(),
                   "invalid value for SKIP_POLICY: `sometimes` (expected skip-existing or redeploy-changed)");
    }

    #[test]
    fn unknown_network_lists_presets() {
        let msg = ConfigError::UnknownNetwork("mainnet".into()).to_string();
        assert!(msg.starts_with("unknown network `mainnet`"));
        assert!(msg.contains("baseSepolia"));
    }
}
