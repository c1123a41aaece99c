//! Sequential transfer campaigns from a deployer wallet to throwaway addresses.

use crate::deployer::DeployedToken;
use crate::registry::WalletContext;
use crate::ui::{Console, WIDE_RULE};
use crate::utils::ChainClient;
use anyhow::{anyhow, Context, Result};
use colored::*;
use ethers::contract::BaseContract;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TxHash, U256};
use ethers::utils::parse_units;
use rand::{CryptoRng, Rng};
use std::io::Write;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Pending,
    Success { tx_hash: TxHash },
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct TransferRecord {
    /// 1-based position in the campaign.
    pub index: usize,
    pub sender: Address,
    pub recipient: Address,
    pub amount: String,
    pub outcome: TransferOutcome,
}

impl TransferRecord {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, TransferOutcome::Success { .. })
    }

    fn row(&self) -> String {
        let status = match &self.outcome {
            TransferOutcome::Pending => "Pending...".yellow().to_string(),
            TransferOutcome::Success { .. } => "✅ Success".green().to_string(),
            TransferOutcome::Failed { reason } => format!("❌ Failed: {}", reason).red().to_string(),
        };
        format!(
            "{:<4}| {:<45}| {:<45}| {:<15}| {}",
            format!("  {}", self.index),
            format!("{:?}", self.sender),
            format!("{:?}", self.recipient),
            self.amount,
            status
        )
    }
}

#[derive(Debug, Clone)]
pub struct CampaignReport {
    pub token: Address,
    pub records: Vec<TransferRecord>,
}

impl CampaignReport {
    pub fn success_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.records.len() - self.success_count()
    }
}

/// A recipient nobody can spend from: the key is dropped on return.
pub fn throwaway_recipient<R: Rng + CryptoRng>(rng: &mut R) -> Address {
    LocalWallet::new(rng).address()
}

/// Runs `count` transfers of `amount` whole tokens, one after another.
///
/// Each transfer is checked against the on-chain balance first; an
/// insufficient balance, or an amount that rounds to zero base units, is
/// recorded as failed without a transaction. Errors
/// never stop the campaign and nothing is retried, so the report always holds
/// exactly `count` records.
pub async fn run_transfers<C, R, W>(
    wallet: &WalletContext<C>,
    token: &DeployedToken,
    count: usize,
    amount: &str,
    rng: &mut R,
    console: &mut Console<W>,
) -> CampaignReport
where
    C: ChainClient,
    R: Rng + CryptoRng,
    W: Write,
{
    let contract = BaseContract::from(token.abi.clone());

    console.section("TRANSFERRING TOKENS");
    console.field("📊 Number of transfers", count);
    console.field("💸 Amount per transfer", amount);
    console.field("🎯 Contract address", format!("{:?}", token.address));
    console.blank();
    console.line("📤 Starting transfers...".cyan().to_string());
    console.blank();
    console.line(WIDE_RULE.cyan().to_string());
    console.line(
        format!(
            "{:<4}| {:<45}| {:<45}| {:<15}| Status",
            "  #", "Sender Address", "Recipient Address", "Amount"
        )
        .bold()
        .to_string(),
    );
    console.line(WIDE_RULE.cyan().to_string());

    let mut records = Vec::with_capacity(count);

    for i in 0..count {
        let mut record = TransferRecord {
            index: i + 1,
            sender: wallet.address,
            recipient: throwaway_recipient(rng),
            amount: amount.to_string(),
            outcome: TransferOutcome::Pending,
        };

        record.outcome = match transfer_once(wallet, token, &contract, &record, console).await {
            Ok(tx_hash) => {
                info!(
                    "Transfer {}/{} of {} {} to {:?} SUCCESS tx {:?}",
                    record.index, count, amount, token.params.symbol, record.recipient, tx_hash
                );
                TransferOutcome::Success { tx_hash }
            }
            Err(e) => {
                warn!(
                    "Transfer {}/{} to {:?} FAILED: {:#}",
                    record.index, count, record.recipient, e
                );
                TransferOutcome::Failed {
                    reason: format!("{:#}", e),
                }
            }
        };
        console.resolve(&record.row());
        records.push(record);
    }

    console.line(WIDE_RULE.cyan().to_string());
    console.blank();
    console.success("Transfer operations completed");

    CampaignReport {
        token: token.address,
        records,
    }
}

async fn transfer_once<C, W>(
    wallet: &WalletContext<C>,
    token: &DeployedToken,
    contract: &BaseContract,
    record: &TransferRecord,
    console: &mut Console<W>,
) -> Result<TxHash>
where
    C: ChainClient,
    W: Write,
{
    let units: U256 = parse_units(&record.amount, token.params.decimals as u32)
        .with_context(|| format!("Invalid amount '{}'", record.amount))?
        .into();
    if units.is_zero() {
        return Err(anyhow!(
            "Amount {} is below token precision ({} decimals)",
            record.amount,
            token.params.decimals
        ));
    }

    let balance_call = contract.encode("balanceOf", wallet.address)?;
    let raw = wallet.client.call(token.address, balance_call).await?;
    let balance: U256 = contract
        .decode_output("balanceOf", raw)
        .context("Malformed balanceOf response")?;
    if balance < units {
        return Err(anyhow!("Insufficient token balance in {:?}", wallet.address));
    }

    let data = contract.encode("transfer", (record.recipient, units))?;
    let tx_hash = wallet
        .client
        .send_transaction(Some(token.address), data, None)
        .await?;

    console.pending(&record.row());

    wallet.client.wait_for_receipt(tx_hash).await?;
    Ok(tx_hash)
}
