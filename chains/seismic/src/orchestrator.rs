//! Interactive session: registry, token prompts, deployment(s), transfer
//! prompts and one campaign per deployed token.

use crate::campaign::{run_transfers, CampaignReport};
use crate::config::RunMode;
use crate::contracts::{TokenParams, TokenVariant};
use crate::deployer::{DeployedToken, TokenDeployer};
use crate::error::RunError;
use crate::registry::{build_wallets, WalletContext};
use crate::ui::{Console, Prompter};
use crate::utils::{ChainClient, ContractCompiler};
use colored::*;
use core_logic::config::ChainConfig;
use core_logic::{PrivateKey, ProxyConfig};
use ethers::types::U256;
use ethers::utils::{parse_units, ParseUnits};
use rand::{CryptoRng, Rng};
use std::io::Write;
use tracing::{error, info, warn};

/// One question of the session. `applies` is checked against the answers
/// collected so far; `apply` validates the trimmed answer and stores it.
pub struct PromptStep<S> {
    pub question: &'static str,
    pub applies: fn(&S) -> bool,
    pub apply: fn(&mut S, &str) -> Result<(), RunError>,
}

#[derive(Debug, Clone)]
pub struct TokenAnswers {
    pub mode: RunMode,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub supply: Option<U256>,
}

impl TokenAnswers {
    fn new(mode: RunMode) -> Self {
        Self {
            mode,
            name: None,
            symbol: None,
            supply: None,
        }
    }

    fn shared_params(&self) -> Result<TokenParams, RunError> {
        let name = self.name.clone().ok_or_else(|| missing("Token name"))?;
        let symbol = self.symbol.clone().ok_or_else(|| missing("Token symbol"))?;
        let supply = self.supply.ok_or_else(|| missing("Total supply"))?;
        Ok(TokenParams::fixed(name, symbol, supply))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransferAnswers {
    pub proceed: bool,
    pub count: usize,
    pub amount: String,
}

pub const TOKEN_STEPS: &[PromptStep<TokenAnswers>] = &[
    PromptStep {
        question: "📝 Enter token name",
        applies: always,
        apply: set_name,
    },
    PromptStep {
        question: "🔤 Enter token symbol",
        applies: always,
        apply: set_symbol,
    },
    PromptStep {
        question: "💰 Enter total supply",
        applies: is_shared,
        apply: set_supply,
    },
];

pub const TRANSFER_STEPS: &[PromptStep<TransferAnswers>] = &[
    PromptStep {
        question: "🔄 Do you want to transfer tokens to random addresses? (y/n)",
        applies: always,
        apply: set_proceed,
    },
    PromptStep {
        question: "📊 Enter number of transfers to perform",
        applies: proceeding,
        apply: set_count,
    },
    PromptStep {
        question: "💸 Enter amount per transfer",
        applies: proceeding,
        apply: set_amount,
    },
];

fn always<S>(_: &S) -> bool {
    true
}

fn is_shared(answers: &TokenAnswers) -> bool {
    answers.mode == RunMode::Shared
}

fn proceeding(answers: &TransferAnswers) -> bool {
    answers.proceed
}

fn missing(field: &str) -> RunError {
    RunError::MissingField {
        field: field.to_string(),
    }
}

fn invalid(field: &str, reason: &str) -> RunError {
    RunError::InvalidInput {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Blank is allowed only in per-wallet mode, where it keeps the profile value.
fn optional_text(mode: RunMode, field: &str, answer: &str) -> Result<Option<String>, RunError> {
    match (answer.is_empty(), mode) {
        (false, _) => Ok(Some(answer.to_string())),
        (true, RunMode::PerWallet) => Ok(None),
        (true, RunMode::Shared) => Err(missing(field)),
    }
}

fn set_name(answers: &mut TokenAnswers, answer: &str) -> Result<(), RunError> {
    answers.name = optional_text(answers.mode, "Token name", answer)?;
    Ok(())
}

fn set_symbol(answers: &mut TokenAnswers, answer: &str) -> Result<(), RunError> {
    answers.symbol = optional_text(answers.mode, "Token symbol", answer)?;
    Ok(())
}

fn set_supply(answers: &mut TokenAnswers, answer: &str) -> Result<(), RunError> {
    if answer.is_empty() {
        return Err(missing("Total supply"));
    }
    let supply = U256::from_dec_str(answer)
        .ok()
        .filter(|s| !s.is_zero())
        .ok_or_else(|| invalid("Total supply", "must be a positive integer"))?;
    answers.supply = Some(supply);
    Ok(())
}

fn set_proceed(answers: &mut TransferAnswers, answer: &str) -> Result<(), RunError> {
    answers.proceed = answer.eq_ignore_ascii_case("y");
    Ok(())
}

fn set_count(answers: &mut TransferAnswers, answer: &str) -> Result<(), RunError> {
    answers.count = answer
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| invalid("Number of transfers", "must be a positive integer"))?;
    Ok(())
}

fn set_amount(answers: &mut TransferAnswers, answer: &str) -> Result<(), RunError> {
    // Checked at the finest precision any token can have; each campaign
    // converts again with its own decimals.
    match parse_units(answer, u32::from(TokenVariant::FIXED_DECIMALS)) {
        Ok(ParseUnits::U256(units)) if !units.is_zero() => {
            answers.amount = answer.to_string();
            Ok(())
        }
        _ => Err(invalid("Amount", "must be a positive decimal number")),
    }
}

/// Asks every applicable step in order. The first invalid answer aborts.
pub fn ask_steps<P, S>(
    prompter: &mut P,
    steps: &[PromptStep<S>],
    answers: &mut S,
) -> Result<(), RunError>
where
    P: Prompter + ?Sized,
{
    for step in steps {
        if !(step.applies)(answers) {
            continue;
        }
        let raw = prompter.ask(step.question)?;
        (step.apply)(answers, raw.trim())?;
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub deployed: Vec<DeployedToken>,
    pub campaigns: Vec<CampaignReport>,
}

impl RunSummary {
    pub fn transfers_succeeded(&self) -> usize {
        self.campaigns.iter().map(CampaignReport::success_count).sum()
    }
}

pub struct Orchestrator<P, W: Write, K> {
    mode: RunMode,
    chain: ChainConfig,
    prompter: P,
    console: Console<W>,
    deployer: TokenDeployer<K>,
}

impl<P, W, K> Orchestrator<P, W, K>
where
    P: Prompter,
    W: Write,
    K: ContractCompiler,
{
    pub fn new(
        mode: RunMode,
        chain: ChainConfig,
        prompter: P,
        console: Console<W>,
        deployer: TokenDeployer<K>,
    ) -> Self {
        Self {
            mode,
            chain,
            prompter,
            console,
            deployer,
        }
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Runs one session. Any error that ends the session is printed and
    /// logged before it is returned.
    pub async fn run<C, F, R>(
        &mut self,
        keys: &[PrivateKey],
        proxies: &[ProxyConfig],
        connect: F,
        rng: &mut R,
    ) -> Result<RunSummary, RunError>
    where
        C: ChainClient,
        F: FnMut(usize, &PrivateKey, Option<&ProxyConfig>) -> Result<C, RunError>,
        R: Rng + CryptoRng,
    {
        match self.session(keys, proxies, connect, rng).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                self.console.error(&format!("Error: {}", e));
                error!("Session failed: {}", e);
                Err(e)
            }
        }
    }

    async fn session<C, F, R>(
        &mut self,
        keys: &[PrivateKey],
        proxies: &[ProxyConfig],
        connect: F,
        rng: &mut R,
    ) -> Result<RunSummary, RunError>
    where
        C: ChainClient,
        F: FnMut(usize, &PrivateKey, Option<&ProxyConfig>) -> Result<C, RunError>,
        R: Rng + CryptoRng,
    {
        if keys.is_empty() {
            return Err(missing("Private keys"));
        }

        self.console.banner("SEISMIC TOKEN AUTO BOT");
        self.console.line(
            format!(
                "🌐 Network: {} (Chain ID: {})",
                self.chain.name, self.chain.chain_id
            )
            .yellow()
            .to_string(),
        );

        let with_profiles = self.mode == RunMode::PerWallet;
        let wallets = build_wallets(keys, proxies, connect, rng, with_profiles).await?;
        self.list_wallets(&wallets);

        let mut token_answers = TokenAnswers::new(self.mode);
        ask_steps(&mut self.prompter, TOKEN_STEPS, &mut token_answers)?;

        let deployed = match self.mode {
            RunMode::Shared => {
                let params = token_answers.shared_params()?;
                let token = self
                    .deployer
                    .deploy(&wallets[0], &params, false, &mut self.console)
                    .await?;
                vec![token]
            }
            RunMode::PerWallet => self.deploy_per_wallet(&wallets, &token_answers).await?,
        };

        let mut transfer_answers = TransferAnswers::default();
        ask_steps(&mut self.prompter, TRANSFER_STEPS, &mut transfer_answers)?;

        if !transfer_answers.proceed {
            self.console.blank();
            self.console
                .line("🎉 Token deployment completed successfully!".green().to_string());
            info!("Transfers declined, {} token(s) deployed", deployed.len());
            return Ok(RunSummary {
                deployed,
                campaigns: Vec::new(),
            });
        }

        let mut campaigns = Vec::with_capacity(deployed.len());
        for token in &deployed {
            let sender = &wallets[token.owner_index];
            let report = run_transfers(
                sender,
                token,
                transfer_answers.count,
                &transfer_answers.amount,
                rng,
                &mut self.console,
            )
            .await;
            info!(
                "Campaign on {:?}: {} succeeded, {} failed",
                token.address,
                report.success_count(),
                report.failed_count()
            );
            if report.failed_count() > 0 {
                self.console.warn(&format!(
                    "{} of {} transfers failed on {:?}",
                    report.failed_count(),
                    report.records.len(),
                    token.address
                ));
            }
            campaigns.push(report);
        }

        self.console.blank();
        self.console
            .line("🎉 All operations completed successfully!".green().to_string());

        Ok(RunSummary {
            deployed,
            campaigns,
        })
    }

    fn list_wallets<C>(&mut self, wallets: &[WalletContext<C>]) {
        self.console.blank();
        self.console
            .success(&format!("Loaded {} wallets:", wallets.len()));
        for wallet in wallets {
            self.console.line(format!(
                "  Wallet {}: {}, Balance: {}, Proxy: {}",
                wallet.index + 1,
                format!("{:?}", wallet.address).yellow(),
                format!("{} ETH", wallet.balance_eth()).yellow(),
                wallet.proxy_label().yellow()
            ));
        }
    }

    /// One deployment per wallet. A failed wallet is reported and skipped.
    async fn deploy_per_wallet<C: ChainClient>(
        &mut self,
        wallets: &[WalletContext<C>],
        answers: &TokenAnswers,
    ) -> Result<Vec<DeployedToken>, RunError> {
        let mut deployed = Vec::with_capacity(wallets.len());

        for wallet in wallets {
            let Some(profile) = wallet.profile.as_ref() else {
                warn!("Wallet {:03} has no token profile, skipping", wallet.index + 1);
                continue;
            };
            let mut params = profile.to_params();
            if let Some(name) = &answers.name {
                params.name = name.clone();
            }
            if let Some(symbol) = &answers.symbol {
                params.symbol = symbol.clone();
            }

            match self
                .deployer
                .deploy(wallet, &params, true, &mut self.console)
                .await
            {
                Ok(token) => deployed.push(token),
                Err(e) => {
                    self.console.error(&format!(
                        "Deployment failed for wallet {}: {}",
                        wallet.index + 1,
                        e
                    ));
                    error!(
                        "Wallet {:03} {:?} deployment FAILED: {}",
                        wallet.index + 1,
                        wallet.address,
                        e
                    );
                }
            }
        }

        if deployed.is_empty() {
            return Err(RunError::NoDeploymentSucceeded {
                attempted: wallets.len(),
            });
        }
        Ok(deployed)
    }
}
