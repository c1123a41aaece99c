//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

pub(crate) mod logger;
pub(crate) mod proxy_manager;
pub(crate) mod wallet_manager;

pub use logger::{colorize_status, setup_logger};
pub use proxy_manager::ProxyManager;
pub use wallet_manager::{PrivateKey, WalletManager};
