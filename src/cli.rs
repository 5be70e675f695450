//! Definición de la CLI (clap derive).
use clap::{Args, Parser, Subcommand};

use crate::deployments::RegistrySelection;

#[derive(Parser, Debug)]
#[command(name = "deployflow")]
#[command(about = "Deterministic DAG deployment of on-chain artifacts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Publish every missing artifact and verify it (simulated ledger seeded from history)
    Deploy(DeployArgs),
    /// Print the deployment order without touching any network
    Plan(SelectionArgs),
    /// Print the recorded deployments of a network
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Registry to use
    #[arg(long, value_enum, default_value_t = RegistrySelection::All)]
    pub registry: RegistrySelection,

    /// Only these tags (plus their dependencies)
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Target network (overrides DEPLOY_NETWORK)
    #[arg(long)]
    pub network: Option<String>,

    /// Deployer address (overrides DEPLOYER)
    #[arg(long)]
    pub deployer: Option<String>,

    /// Republish artifacts whose resolved inputs changed
    #[arg(long)]
    pub redeploy_changed: bool,

    /// Do not retry verification of reused, unverified records
    #[arg(long)]
    pub no_verify_reused: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// Network to inspect (overrides DEPLOY_NETWORK)
    #[arg(long)]
    pub network: Option<String>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}
