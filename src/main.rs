use clap::Parser;
use deployflow::cli::{Cli, Command, DeployArgs, SelectionArgs, StatusArgs};
use deployflow::config::AppConfig;
use deployflow::errors::{AppError, ConfigError};
use deployflow::{app, deployments};
use deploy_core::{Address, SkipPolicy};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Deploy(args) => deploy(args).await,
        Command::Plan(args) => plan(&args),
        Command::Status(args) => status(args),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn deploy(args: DeployArgs) -> Result<(), AppError> {
    let mut config = AppConfig::from_env()?;
    if let Some(network) = args.network {
        config.network = network;
    }
    if let Some(raw) = args.deployer {
        let deployer = Address::parse(&raw).map_err(|e| ConfigError::invalid("--deployer", &raw, e.to_string()))?;
        config.deployer = Some(deployer);
    }
    if args.redeploy_changed {
        config.run.skip_policy = SkipPolicy::RedeployChanged;
    }
    if args.no_verify_reused {
        config.run.verify_reused = false;
    }
    let registry = deployments::registry(args.selection.registry, &args.selection.tags)?;
    let report = app::deploy(&config, &registry).await?;
    print!("{}", app::render_report(&report));
    Ok(())
}

fn plan(args: &SelectionArgs) -> Result<(), AppError> {
    let registry = deployments::registry(args.registry, &args.tags)?;
    print!("{}", app::render_plan(&registry));
    Ok(())
}

fn status(args: StatusArgs) -> Result<(), AppError> {
    let mut config = AppConfig::from_env()?;
    if let Some(network) = args.network {
        config.network = network;
    }
    let history = app::status(&config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else {
        print!("{}", app::render_status(&config.network, &history));
    }
    Ok(())
}
