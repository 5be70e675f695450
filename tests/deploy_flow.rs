//! Flujo completo `deploy` sobre el historial en archivos.

use deploy_core::{Address, ArtifactAction, HistoryStore, RunEventKind, VerificationStatus};
use deploy_persistence::JsonFileHistoryStore;
use deployflow::app;
use deployflow::config::AppConfig;
use deployflow::deployments::{self, RegistrySelection};
use deployflow::errors::AppError;
use serde_json::json;

fn config(dir: &std::path::Path, network: &str) -> AppConfig {
    AppConfig { network: network.into(),
                deployer: Some(Address::from_bytes(&[0xde; 20])),
                history_dir: dir.to_path_buf(),
                ..AppConfig::default() }
}

#[tokio::test]
async fn crucible_deploys_once_and_reuses_across_runs() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = config(tmp.path(), "baseSepolia");
    let registry = deployments::registry(RegistrySelection::Crucible, &[]).expect("registry");

    let first = app::deploy(&cfg, &registry).await.expect("first deploy");
    assert_eq!(first.published().collect::<Vec<_>>(),
               vec!["NuggetSpecLib", "IngotSpecLib", "NativeFixedFeeCalculator", "Crucible"]);
    assert!(first.is_clean());

    let crucible = first.state.get("Crucible").expect("crucible");
    let calculator = first.state.get("NativeFixedFeeCalculator").expect("calculator");
    let ingot = first.state.get("IngotSpecLib").expect("ingot");
    let deployer = Address::from_bytes(&[0xde; 20]);
    assert_eq!(crucible.constructor_args_used,
               vec![json!("0x6edce65403992e310a62460808c4b910d972f10f"),
                    json!(deployer.as_str()),
                    json!(calculator.location.as_str()),
                    json!(deployer.as_str())]);
    assert_eq!(crucible.libraries_used.get("IngotSpecLib"), Some(&ingot.location));
    assert_eq!(calculator.constructor_args_used, vec![json!(0), json!(0), json!(0)]);
    assert!(tmp.path().join("baseSepolia").join("Crucible.json").exists());

    // Nuevo proceso: el ledger simulado se siembra desde el historial en disco.
    let second = app::deploy(&cfg, &registry).await.expect("second deploy");
    assert_eq!(second.published().count(), 0);
    assert!(second.outcomes.iter().all(|o| o.action == ArtifactAction::Reused { stale: false }));
    assert_eq!(first.fingerprint, second.fingerprint);
    assert!(!second.events.iter().any(|e| matches!(e.kind, RunEventKind::Published { .. })));

    let history = app::status(&cfg).expect("status");
    assert_eq!(history.len(), 4);
    assert!(history.values().all(|r| r.verified));
    assert!(app::render_status("baseSepolia", &history).contains("Crucible"));
}

#[tokio::test]
async fn crucible_on_hardhat_lacks_the_endpoint() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = config(tmp.path(), "hardhat");
    let registry = deployments::registry(RegistrySelection::Crucible, &[]).expect("registry");

    let err = app::deploy(&cfg, &registry).await.unwrap_err();
    assert_eq!(err.exit_code(), 4);
    assert!(matches!(err, AppError::Deploy(_)));
    assert!(!tmp.path().join("hardhat").exists(), "nothing is written on precondition failure");
}

#[tokio::test]
async fn mocks_deploy_on_a_local_network() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = config(tmp.path(), "hardhat");
    let registry = deployments::registry(RegistrySelection::All, &["Mocks".to_string()]).expect("registry");

    let report = app::deploy(&cfg, &registry).await.expect("deploy");
    assert_eq!(report.published().count(), 3);
    let erc20 = report.state.get("ERC20Mock").expect("erc20");
    assert_eq!(erc20.constructor_args_used, vec![json!("ERC20Mock"), json!("ERC20Mock")]);
    let rendered = app::render_report(&report);
    assert!(rendered.contains("ERC1155Mock"));
    assert!(rendered.contains("fingerprint"));
}

#[tokio::test]
async fn unknown_network_is_a_configuration_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = config(tmp.path(), "mainnet");
    let registry = deployments::registry(RegistrySelection::Mocks, &[]).expect("registry");
    let err = app::deploy(&cfg, &registry).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn plan_lists_every_artifact_in_order() {
    let registry = deployments::registry(RegistrySelection::All, &[]).expect("registry");
    let plan = app::render_plan(&registry);
    let lines: Vec<&str> = plan.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[0].ends_with("NuggetSpecLib"));
    assert!(lines.iter().any(|l| l.contains("Crucible") && l.contains("links: IngotSpecLib")));
}

#[tokio::test]
async fn unverified_records_on_disk_verify_in_a_new_process() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = config(tmp.path(), "hardhat");
    let registry = deployments::registry(RegistrySelection::Mocks, &[]).expect("registry");
    let first = app::deploy(&cfg, &registry).await.expect("first deploy");

    let mut store = JsonFileHistoryStore::new(tmp.path(), "hardhat");
    let mut erc20 = first.state.get("ERC20Mock").expect("erc20").clone();
    erc20.verified = false;
    store.record(&erc20).expect("rewrite record");

    let second = app::deploy(&cfg, &registry).await.expect("second deploy");
    assert_eq!(second.published().count(), 0);
    assert!(second.is_clean());
    assert!(matches!(second.outcome("ERC20Mock").map(|o| &o.verification),
                     Some(VerificationStatus::Verified { .. })));
    assert!(app::status(&cfg).expect("status")["ERC20Mock"].verified);
}
