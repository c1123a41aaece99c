//! # Core Logic - Shared Utilities for Testnet Tooling
//!
//! Chain-agnostic pieces shared by the chain binaries: credential and proxy
//! loading, the error taxonomy, shared config records and logging.
//!
//! ## Modules
//!
//! - [`config`] - Proxy and chain configuration records
//! - [`error`] - Typed error handling with thiserror
//! - `utils` - Wallet/proxy file loaders and logger setup

pub mod config;
pub mod error;
pub(crate) mod utils;

pub use config::{ChainConfig, ProxyConfig};
pub use error::{ConfigError, NetworkError, WalletError};

pub use utils::{colorize_status, setup_logger, PrivateKey, ProxyManager, WalletManager};
