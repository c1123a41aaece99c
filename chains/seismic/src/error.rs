//! Errors raised by the deploy and transfer flow.

use core_logic::{ConfigError, NetworkError, WalletError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Deployer wallet {address} has no ETH for transaction fees")]
    InsufficientFunds { address: String },

    #[error("Compilation errors: {}", diagnostics.join("; "))]
    Compilation { diagnostics: Vec<String> },

    #[error("Contract {contract} not found in compilation output")]
    ContractNotFound { contract: String },

    #[error("Receipt of {tx_hash} carries no contract address")]
    MissingContractAddress { tx_hash: String },

    #[error("ABI encoding failed: {0}")]
    Abi(String),

    #[error("I/O error on {path}: {msg}")]
    Io { path: String, msg: String },

    #[error(transparent)]
    Network(#[from] NetworkError),
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("{field} is required")]
    MissingField { field: String },

    #[error("{field} {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("No token deployment succeeded ({attempted} attempted)")]
    NoDeploymentSucceeded { attempted: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}
