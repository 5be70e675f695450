//! Configuración central de la aplicación.
//!
//! Se lee del entorno (con `.env` cargado una sola vez) y los flags de la CLI
//! pisan los valores resultantes.
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use deploy_core::{Address, NamedAccounts, RetryPolicy, RunConfig, SkipPolicy};
use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::errors::ConfigError;
use crate::networks;

static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

const NAMED_ACCOUNT_PREFIX: &str = "NAMED_ACCOUNT_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryBackend {
    #[default]
    File,
    Postgres,
}

impl FromStr for HistoryBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "postgres" | "pg" => Ok(Self::Postgres),
            _ => Err(ConfigError::invalid("HISTORY_BACKEND", s, "expected file or postgres")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub network: String,
    pub deployer: Option<Address>,
    pub history_backend: HistoryBackend,
    pub history_dir: PathBuf,
    pub run: RunConfig,
    /// Roles adicionales desde `NAMED_ACCOUNT_<ROLE>`.
    pub extra_accounts: BTreeMap<String, Address>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { network: "hardhat".into(),
               deployer: None,
               history_backend: HistoryBackend::File,
               history_dir: PathBuf::from("deployments"),
               run: RunConfig::default(),
               extra_accounts: BTreeMap::new() }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_vars(env::vars())
    }

    /// Construye la configuración a partir de pares `(clave, valor)`.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
        where I: IntoIterator<Item = (String, String)>
    {
        let vars: BTreeMap<String, String> = vars.into_iter().collect();
        let mut cfg = Self::default();

        if let Some(network) = vars.get("DEPLOY_NETWORK") {
            cfg.network = network.clone();
        }
        if let Some(raw) = vars.get("DEPLOYER") {
            cfg.deployer = Some(parse_address("DEPLOYER", raw)?);
        }
        if let Some(raw) = vars.get("HISTORY_BACKEND") {
            cfg.history_backend = raw.parse()?;
        }
        if let Some(dir) = vars.get("HISTORY_DIR") {
            cfg.history_dir = PathBuf::from(dir);
        }

        let defaults = RetryPolicy::default();
        cfg.run.retry = RetryPolicy { max_attempts: parse_or(&vars, "VERIFY_MAX_ATTEMPTS", defaults.max_attempts)?,
                                      initial_delay: Duration::from_millis(parse_or(&vars,
                                                                                    "VERIFY_INITIAL_DELAY_MS",
                                                                                    defaults.initial_delay.as_millis()
                                                                                            as u64)?),
                                      max_delay: Duration::from_millis(parse_or(&vars,
                                                                                "VERIFY_MAX_DELAY_MS",
                                                                                defaults.max_delay.as_millis()
                                                                                        as u64)?) };
        if let Some(raw) = vars.get("SKIP_POLICY") {
            cfg.run.skip_policy = parse_skip_policy(raw)?;
        }
        cfg.run.verify_reused = parse_or(&vars, "VERIFY_REUSED", cfg.run.verify_reused)?;

        for (key, raw) in vars.range(NAMED_ACCOUNT_PREFIX.to_string()..) {
            let Some(role) = key.strip_prefix(NAMED_ACCOUNT_PREFIX) else {
                break;
            };
            if role.is_empty() {
                continue;
            }
            cfg.extra_accounts.insert(role.to_ascii_lowercase(), parse_address(key, raw)?);
        }
        Ok(cfg)
    }

    pub fn named_accounts(&self) -> Result<NamedAccounts, ConfigError> {
        networks::named_accounts(&self.network, self.deployer.as_ref(), &self.extra_accounts)
    }
}

pub fn parse_skip_policy(raw: &str) -> Result<SkipPolicy, ConfigError> {
    match raw {
        "skip-existing" => Ok(SkipPolicy::SkipExisting),
        "redeploy-changed" => Ok(SkipPolicy::RedeployChanged),
        _ => Err(ConfigError::invalid("SKIP_POLICY", raw, "expected skip-existing or redeploy-changed")),
    }
}

fn parse_address(key: &str, raw: &str) -> Result<Address, ConfigError> {
    Address::parse(raw).map_err(|e| ConfigError::invalid(key, raw, e.to_string()))
}

fn parse_or<T>(vars: &BTreeMap<String, String>, key: &str, default: T) -> Result<T, ConfigError>
    where T: FromStr,
          T::Err: std::fmt::Display
{
    match vars.get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::invalid(key, raw, e.to_string())),
    }
}
