//! Fixed token contract sources, embedded at build time.

use ethers::abi::Token;
use ethers::types::{Address, U256};

pub const TOKEN_CONTRACT_NAME: &str = "SeismicToken";

const FIXED_DECIMALS_SOURCE: &str = include_str!("../contracts/SeismicToken.sol");
const CUSTOM_DECIMALS_SOURCE: &str = include_str!("../contracts/SeismicTokenCustomDecimals.sol");

/// Which constructor shape the deployed contract exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenVariant {
    /// `constructor(name, symbol, totalSupply)`, decimals hard-wired to 18.
    FixedDecimals,
    /// `constructor(name, symbol, decimals, totalSupply)`.
    CustomDecimals,
}

impl TokenVariant {
    pub const FIXED_DECIMALS: u8 = 18;

    pub fn source(&self) -> &'static str {
        match self {
            TokenVariant::FixedDecimals => FIXED_DECIMALS_SOURCE,
            TokenVariant::CustomDecimals => CUSTOM_DECIMALS_SOURCE,
        }
    }
}

/// Constructor inputs of a single deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParams {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Whole tokens; the contract scales by `10^decimals`.
    pub supply: U256,
    pub variant: TokenVariant,
}

impl TokenParams {
    pub fn fixed(name: impl Into<String>, symbol: impl Into<String>, supply: U256) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: TokenVariant::FIXED_DECIMALS,
            supply,
            variant: TokenVariant::FixedDecimals,
        }
    }

    pub fn constructor_args(&self) -> Vec<Token> {
        let mut args = vec![
            Token::String(self.name.clone()),
            Token::String(self.symbol.clone()),
        ];
        if self.variant == TokenVariant::CustomDecimals {
            args.push(Token::Uint(U256::from(self.decimals)));
        }
        args.push(Token::Uint(self.supply));
        args
    }

    /// Total supply in base units as the contract computes it.
    pub fn total_supply_units(&self) -> U256 {
        self.supply * U256::exp10(self.decimals as usize)
    }

    /// Source file name. Per-owner files keep concurrent deployments from
    /// overwriting each other's source.
    pub fn source_file_name(&self, owner: Option<Address>) -> String {
        match owner {
            Some(addr) => format!("{}_{:?}.sol", TOKEN_CONTRACT_NAME, addr),
            None => format!("{}.sol", TOKEN_CONTRACT_NAME),
        }
    }
}
