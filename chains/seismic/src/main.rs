use seismic_project::config::{RunMode, SeismicConfig};
use seismic_project::deployer::TokenDeployer;
use seismic_project::error::RunError;
use seismic_project::orchestrator::Orchestrator;
use seismic_project::ui::{Console, DialoguerPrompter};
use seismic_project::utils::{Connection, SolcCompiler, WalletClient};

use anyhow::Result;
use clap::Parser;
use colored::*;
use core_logic::{setup_logger, ProxyManager, WalletManager};
use dotenv::dotenv;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    /// Overrides the configured run mode.
    #[arg(short, long, value_enum)]
    mode: Option<RunMode>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Dropping the guard flushes the file log, so it must outlive the run.
    let _log_guard = setup_logger();
    dotenv().ok();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    info!("Loading config from: {}", args.config);
    let mut config = match SeismicConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", format!("❌ Failed to load config: {:#}", e).red());
            return Err(e);
        }
    };
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    info!(
        "Configuration loaded for chain ID: {} in {:?} mode",
        config.chain_id, config.mode
    );

    let keys = match WalletManager::load_keys(&config.wallets_file) {
        Ok(keys) => keys,
        Err(e) => {
            eprintln!("{}", format!("❌ {}", e).red());
            return Err(e.into());
        }
    };
    let proxies = ProxyManager::load_proxies(&config.proxies_file)?;
    info!("Loaded {} keys and {} proxies", keys.len(), proxies.len());

    let deployer = TokenDeployer::new(SolcCompiler::default(), &config.contracts_dir)
        .with_gas_limit(config.deploy_gas_limit)
        .with_chain_label(config.chain().name)
        .with_explorer(&config.explorer_url);

    let mut orchestrator = Orchestrator::new(
        config.mode,
        config.chain(),
        DialoguerPrompter::default(),
        Console::stdout(),
        deployer,
    );

    let mut rng = StdRng::from_entropy();
    let summary = orchestrator
        .run(
            &keys,
            &proxies,
            |index, key, proxy| -> Result<WalletClient, RunError> {
                let connection = Connection::open(&config.rpc_url, config.chain_id, proxy)?;
                Ok(WalletClient::new(connection, key, index)?)
            },
            &mut rng,
        )
        .await?;

    info!(
        "Run finished: {} token(s) deployed, {} transfer(s) succeeded",
        summary.deployed.len(),
        summary.transfers_succeeded()
    );
    Ok(())
}
