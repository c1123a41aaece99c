//! Wallet registry: one [`WalletContext`] per loaded key, each with its own
//! client, pinned proxy and startup balance.

use crate::contracts::{TokenParams, TokenVariant};
use crate::error::RunError;
use crate::utils::ChainClient;
use core_logic::{PrivateKey, ProxyConfig, ProxyManager};
use ethers::types::{Address, U256};
use ethers::utils::format_units;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

const NAME_CANDIDATES: [(&str, &str); 8] = [
    ("Seismic", "SEIS"),
    ("Quantum", "QNTM"),
    ("Nebula", "NBLA"),
    ("Aurora", "AUR"),
    ("Vertex", "VTX"),
    ("Zenith", "ZNTH"),
    ("Pulse", "PLS"),
    ("Orbit", "ORB"),
];
const DECIMAL_CANDIDATES: [u8; 3] = [6, 8, 18];
const SUPPLY_CANDIDATES: [u64; 4] = [1_000_000, 10_000_000, 100_000_000, 1_000_000_000];

/// Per-wallet token parameters, picked once when the registry is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenProfile {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub supply: U256,
}

impl TokenProfile {
    /// `position` is the zero-based wallet index; it is appended (1-based) to
    /// the name and symbol.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, position: usize) -> Self {
        let (name, symbol) = NAME_CANDIDATES
            .choose(rng)
            .copied()
            .unwrap_or(NAME_CANDIDATES[0]);
        let decimals = DECIMAL_CANDIDATES
            .choose(rng)
            .copied()
            .unwrap_or(TokenVariant::FIXED_DECIMALS);
        let supply = SUPPLY_CANDIDATES
            .choose(rng)
            .copied()
            .unwrap_or(SUPPLY_CANDIDATES[0]);

        Self {
            name: format!("{} Token {}", name, position + 1),
            symbol: format!("{}{}", symbol, position + 1),
            decimals,
            supply: U256::from(supply),
        }
    }

    pub fn to_params(&self) -> TokenParams {
        TokenParams {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
            supply: self.supply,
            variant: TokenVariant::CustomDecimals,
        }
    }
}

#[derive(Debug)]
pub struct WalletContext<C> {
    pub index: usize,
    pub address: Address,
    /// Native balance in wei, captured once at registry build time.
    pub balance: U256,
    pub proxy: Option<ProxyConfig>,
    pub profile: Option<TokenProfile>,
    pub client: C,
}

impl<C> WalletContext<C> {
    pub fn balance_eth(&self) -> String {
        format_units(self.balance, "ether").unwrap_or_else(|_| self.balance.to_string())
    }

    pub fn proxy_label(&self) -> String {
        self.proxy
            .as_ref()
            .map(ProxyConfig::redacted)
            .unwrap_or_else(|| "None".to_string())
    }
}

/// Builds the registry in key order. The first failing connection or balance
/// query aborts the whole build.
pub async fn build_wallets<C, F, R>(
    keys: &[PrivateKey],
    proxies: &[ProxyConfig],
    mut connect: F,
    rng: &mut R,
    with_profiles: bool,
) -> Result<Vec<WalletContext<C>>, RunError>
where
    C: ChainClient,
    F: FnMut(usize, &PrivateKey, Option<&ProxyConfig>) -> Result<C, RunError>,
    R: Rng + ?Sized,
{
    let mut wallets = Vec::with_capacity(keys.len());

    for (index, key) in keys.iter().enumerate() {
        let proxy = ProxyManager::assign(proxies, index);
        let client = connect(index, key, proxy)?;
        let address = client.address();
        let balance = client.native_balance().await?;
        let profile = with_profiles.then(|| TokenProfile::generate(rng, index));

        info!(
            "Wallet {:03} {:?} balance {} wei via {}",
            index + 1,
            address,
            balance,
            proxy.map(ProxyConfig::redacted).unwrap_or_else(|| "direct".into())
        );

        wallets.push(WalletContext {
            index,
            address,
            balance,
            proxy: proxy.cloned(),
            profile,
            client,
        });
    }

    Ok(wallets)
}
