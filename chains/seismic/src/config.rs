use anyhow::Result;
use config::{Config, Environment, File};
use core_logic::config::ChainConfig;
use core_logic::{ConfigError, ProxyManager, WalletManager};
use serde::Deserialize;

pub const DEFAULT_RPC_URL: &str = "https://node-2.seismicdev.net/rpc";
pub const DEFAULT_CHAIN_ID: u64 = 5124;
pub const DEFAULT_EXPLORER_URL: &str = "https://explorer-2.seismicdev.net";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// One token deployed by the first wallet.
    Shared,
    /// One token per wallet, each with its own random profile.
    PerWallet,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeismicConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub explorer_url: String,
    pub wallets_file: String,
    pub proxies_file: String,
    pub contracts_dir: String,
    pub deploy_gas_limit: u64,
    pub mode: RunMode,
}

impl Default for SeismicConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            wallets_file: WalletManager::WALLETS_FILE.to_string(),
            proxies_file: ProxyManager::PROXY_FILE.to_string(),
            contracts_dir: ".".to_string(),
            deploy_gas_limit: crate::deployer::DEPLOY_GAS_LIMIT,
            mode: RunMode::Shared,
        }
    }
}

impl SeismicConfig {
    /// Defaults, then the optional TOML file, then `SEISMIC_*` variables.
    pub fn load(path: &str) -> Result<Self> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("rpc_url", defaults.rpc_url)?
            .set_default("chain_id", defaults.chain_id as i64)?
            .set_default("explorer_url", defaults.explorer_url)?
            .set_default("wallets_file", defaults.wallets_file)?
            .set_default("proxies_file", defaults.proxies_file)?
            .set_default("contracts_dir", defaults.contracts_dir)?
            .set_default("deploy_gas_limit", defaults.deploy_gas_limit as i64)?
            .set_default("mode", "shared")?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("SEISMIC").try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if url::Url::parse(&self.rpc_url).is_err() {
            return Err(ConfigError::InvalidRpcUrl {
                url: self.rpc_url.clone(),
            });
        }
        if self.chain_id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chain_id".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }
        if self.deploy_gas_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "deploy_gas_limit".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn chain(&self) -> ChainConfig {
        ChainConfig {
            name: "Seismic devnet".to_string(),
            rpc_endpoint: self.rpc_url.clone(),
            chain_id: self.chain_id,
        }
    }
}
