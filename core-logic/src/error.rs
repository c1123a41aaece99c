//! # Core Error Types
//!
//! Centralized error definitions for the core-logic crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Invalid RPC URL format: '{url}'")]
    InvalidRpcUrl { url: String },

    #[error("Missing required configuration field: '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },

    #[error("No valid private keys found in {path}")]
    NoValidKeys { path: String },

    #[error("Invalid proxy URL '{url}': {reason}")]
    InvalidProxyUrl { url: String, reason: String },
}

/// Wallet and cryptographic operation errors
#[derive(Error, Debug, Clone)]
pub enum WalletError {
    #[error("Private key at line {index} rejected by signer: {reason}")]
    RejectedKey { index: usize, reason: String },
}

/// Network and RPC-related errors.
///
/// A `NetworkError` aborts the single call that raised it; the connection
/// that produced it stays usable.
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Proxy request failed via {proxy}: {reason}")]
    Proxy { proxy: String, reason: String },

    #[error("RPC request to {endpoint} failed: {reason}")]
    Rpc { endpoint: String, reason: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("Transaction {tx_hash} was dropped before it was mined")]
    TransactionDropped { tx_hash: String },

    #[error("Transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: String },
}
