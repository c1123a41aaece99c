//! Token deployment: balance gate, source materialization, compilation and
//! the contract-creation transaction.

use crate::contracts::{TokenParams, TOKEN_CONTRACT_NAME};
use crate::error::DeployError;
use crate::registry::WalletContext;
use crate::ui::Console;
use crate::utils::{ChainClient, ContractCompiler};
use ethers::abi::Abi;
use ethers::types::{Address, Bytes, TxHash, U256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEPLOY_GAS_LIMIT: u64 = 3_000_000;

#[derive(Debug, Clone)]
pub struct DeployedToken {
    pub address: Address,
    pub abi: Abi,
    pub owner_index: usize,
    pub owner: Address,
    pub tx_hash: TxHash,
    pub params: TokenParams,
}

pub struct TokenDeployer<K> {
    compiler: K,
    contracts_dir: PathBuf,
    gas_limit: U256,
    chain_label: String,
    explorer_url: String,
}

impl<K: ContractCompiler> TokenDeployer<K> {
    pub fn new(compiler: K, contracts_dir: impl Into<PathBuf>) -> Self {
        Self {
            compiler,
            contracts_dir: contracts_dir.into(),
            gas_limit: U256::from(DEPLOY_GAS_LIMIT),
            chain_label: "Seismic devnet".to_string(),
            explorer_url: String::new(),
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = U256::from(gas_limit);
        self
    }

    pub fn with_chain_label(mut self, label: impl Into<String>) -> Self {
        self.chain_label = label.into();
        self
    }

    pub fn with_explorer(mut self, explorer_url: impl Into<String>) -> Self {
        self.explorer_url = explorer_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn gas_limit(&self) -> U256 {
        self.gas_limit
    }

    /// Deploys `params` from `wallet`. `per_wallet_source` writes the source
    /// to a file named after the wallet instead of the shared file.
    pub async fn deploy<C, W>(
        &self,
        wallet: &WalletContext<C>,
        params: &TokenParams,
        per_wallet_source: bool,
        console: &mut Console<W>,
    ) -> Result<DeployedToken, DeployError>
    where
        C: ChainClient,
        W: Write,
    {
        console.section("DEPLOYING TOKEN CONTRACT");
        console.field("📝 Token Name", &params.name);
        console.field("🔤 Token Symbol", &params.symbol);
        console.field("🔢 Decimals", params.decimals);
        console.field("💰 Total Supply", params.supply);
        console.field(
            "🌐 Network",
            format!("{} (Chain ID: {})", self.chain_label, wallet.client.chain_id()),
        );
        console.field("👛 Deployer", format!("{:?}", wallet.address));
        console.field("💎 Wallet Balance", format!("{} ETH", wallet.balance_eth()));
        console.field("🌐 Proxy", wallet.proxy_label());

        if wallet.balance.is_zero() {
            return Err(DeployError::InsufficientFunds {
                address: format!("{:?}", wallet.address),
            });
        }

        let owner = per_wallet_source.then_some(wallet.address);
        let source_path = self.write_source(params, owner)?;
        console.field("📄 Contract saved to", source_path.display());

        let compiled = self.compiler.compile(&source_path, TOKEN_CONTRACT_NAME)?;
        console.success("Contract compiled successfully");

        let constructor = compiled.abi.constructor().ok_or_else(|| {
            DeployError::Abi(format!("{} ABI has no constructor", TOKEN_CONTRACT_NAME))
        })?;
        let creation_code = constructor
            .encode_input(compiled.bytecode.to_vec(), &params.constructor_args())
            .map_err(|e| DeployError::Abi(e.to_string()))?;

        console.line("⏳ Initiating deployment...");
        let tx_hash = wallet
            .client
            .send_transaction(None, Bytes::from(creation_code), Some(self.gas_limit))
            .await?;
        console.field("🔄 Transaction hash", format!("{:?}", tx_hash));
        console.line("⏳ Waiting for confirmation...");

        let receipt = wallet.client.wait_for_receipt(tx_hash).await?;
        let address = receipt
            .contract_address
            .ok_or_else(|| DeployError::MissingContractAddress {
                tx_hash: format!("{:?}", tx_hash),
            })?;

        console.blank();
        console.success("Token Contract deployed successfully!");
        console.field("📍 Contract address", format!("{:?}", address));
        if !self.explorer_url.is_empty() {
            console.field(
                "🔍 View on explorer",
                format!("{}/address/{:?}", self.explorer_url, address),
            );
        }

        info!(
            "Deployed {} ({}) at {:?} from wallet {:03} tx {:?}",
            params.name,
            params.symbol,
            address,
            wallet.index + 1,
            tx_hash
        );

        Ok(DeployedToken {
            address,
            abi: compiled.abi,
            owner_index: wallet.index,
            owner: wallet.address,
            tx_hash,
            params: params.clone(),
        })
    }

    fn write_source(
        &self,
        params: &TokenParams,
        owner: Option<Address>,
    ) -> Result<PathBuf, DeployError> {
        let path = self.contracts_dir.join(params.source_file_name(owner));
        write_file(&path, params.variant.source())?;
        Ok(path)
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), DeployError> {
    fs::write(path, content).map_err(|e| DeployError::Io {
        path: path.display().to_string(),
        msg: e.to_string(),
    })
}
