//! Casos de uso de la CLI: `deploy`, `plan` y `status`.
use std::fmt::Write as _;
use std::sync::Arc;

use deploy_adapters::{ExplorerSimulator, SimulatedLedger};
use deploy_core::constants::DEPLOYER_ROLE;
use deploy_core::{ArtifactAction, DeployError, History, HistoryStore, OrchestratorBuilder, Registry, RunReport,
                  VerificationStatus};
use deploy_persistence::{build_pool_from_env, JsonFileHistoryStore, PgHistoryStore, PoolProvider};
use log::{debug, info};

use crate::config::{AppConfig, HistoryBackend};
use crate::errors::AppError;

/// Ejecuta un run sobre el historial configurado, con ledger y verificador
/// simulados.
pub async fn deploy(config: &AppConfig, registry: &Registry) -> Result<RunReport, AppError> {
    match config.history_backend {
        HistoryBackend::File => {
            let store = JsonFileHistoryStore::new(&config.history_dir, &config.network);
            deploy_with_store(config, registry, store).await
        }
        HistoryBackend::Postgres => {
            let pool = build_pool_from_env()?;
            let store = PgHistoryStore::new(PoolProvider { pool }, config.network.clone());
            deploy_with_store(config, registry, store).await
        }
    }
}

pub async fn deploy_with_store<H: HistoryStore>(config: &AppConfig,
                                                registry: &Registry,
                                                history: H)
                                                -> Result<RunReport, AppError> {
    let accounts = config.named_accounts()?;
    let ledger = match accounts.get(DEPLOYER_ROLE) {
        // Cada proceso arranca con un ledger vacío: se siembra con lo ya
        // publicado para que los registros reutilizados sigan verificables.
        Some(deployer) => {
            let prior = history.load()
                               .map_err(|e| DeployError::HistoryLoadFailed(e.to_string()))?;
            debug!("deploy:seed_ledger records={}", prior.len());
            SimulatedLedger::new().seeded(prior.values(), deployer)
        }
        None => SimulatedLedger::new(),
    };
    let ledger = Arc::new(ledger);
    let explorer = ExplorerSimulator::new(ledger.clone());
    let mut orchestrator = OrchestratorBuilder::new(ledger, explorer, history, accounts).config(config.run)
                                                                                      .build();
    info!("deploy network={} artifacts={} backend={:?}",
          config.network,
          registry.len(),
          config.history_backend);
    Ok(orchestrator.run(registry).await?)
}

pub fn status(config: &AppConfig) -> Result<History, AppError> {
    let history = match config.history_backend {
        HistoryBackend::File => JsonFileHistoryStore::new(&config.history_dir, &config.network).load_records()?,
        HistoryBackend::Postgres => {
            let pool = build_pool_from_env()?;
            PgHistoryStore::new(PoolProvider { pool }, config.network.clone()).load_records()?
        }
    };
    Ok(history)
}

pub fn render_plan(registry: &Registry) -> String {
    let mut out = String::new();
    for (i, spec) in registry.topological_order().enumerate() {
        let _ = write!(out, "{:>2}. {}", i + 1, spec.name);
        if !spec.dependencies.is_empty() {
            let libs: Vec<&str> = spec.dependencies.values().map(String::as_str).collect();
            let _ = write!(out, "  [links: {}]", libs.join(", "));
        }
        out.push('\n');
    }
    out
}

pub fn render_report(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "run {} on {}", report.run_id, report.network);
    for o in &report.outcomes {
        let action = match &o.action {
            ArtifactAction::Published { .. } => "published",
            ArtifactAction::Reused { stale: false } => "reused",
            ArtifactAction::Reused { stale: true } => "reused (stale)",
        };
        let verification = match &o.verification {
            VerificationStatus::Verified { already_verified: true, .. } => "already verified".to_string(),
            VerificationStatus::Verified { attempts, .. } => format!("verified ({attempts} attempt(s))"),
            VerificationStatus::PreviouslyVerified => "verified".to_string(),
            VerificationStatus::Failed { error, .. } => format!("verification failed: {error}"),
            VerificationStatus::Skipped => "not verified".to_string(),
        };
        let _ = writeln!(out, "  {:<26} {:<15} {}  {}", o.name, action, o.location, verification);
    }
    let _ = writeln!(out, "fingerprint {}", report.fingerprint);
    if !report.is_clean() {
        let _ = writeln!(out, "completed with {} caveat(s)", report.caveats());
    }
    out
}

pub fn render_status(network: &str, history: &History) -> String {
    if history.is_empty() {
        return format!("no deployments recorded for {network}\n");
    }
    let mut out = String::new();
    for record in history.values() {
        let _ = writeln!(out,
                         "{:<26} {}  {}  {}",
                         record.name,
                         record.location,
                         record.published_at.to_rfc3339(),
                         if record.verified { "verified" } else { "unverified" });
    }
    out
}
