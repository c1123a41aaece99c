use crate::error::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop};

static KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0x)?[0-9a-fA-F]{64}$").expect("static private key pattern is valid")
});

/// A 32-byte secp256k1 secret in canonical `0x`-prefixed hex form.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(String);

impl PrivateKey {
    /// Returns `None` unless the trimmed line is exactly 64 hex digits with an
    /// optional `0x` prefix.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if !KEY_PATTERN.is_match(trimmed) {
            return None;
        }
        let normalized = if trimmed.starts_with("0x") {
            trimmed.to_string()
        } else {
            format!("0x{}", trimmed)
        };
        Some(Self(normalized))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(***REDACTED***)")
    }
}

pub struct WalletManager;

impl WalletManager {
    pub const WALLETS_FILE: &'static str = "wallets.txt";

    /// Loads private keys from a flat file, one per line, in file order.
    pub fn load_keys(path: impl AsRef<Path>) -> Result<Vec<PrivateKey>, ConfigError> {
        let path = path.as_ref();
        let path_label = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path_label.clone(),
            },
            _ => ConfigError::IoError {
                path: path_label.clone(),
                msg: e.to_string(),
            },
        })?;

        let keys = Self::parse_keys(&content);
        if keys.is_empty() {
            return Err(ConfigError::NoValidKeys { path: path_label });
        }

        info!("Loaded {} private keys from {}", keys.len(), path_label);
        Ok(keys)
    }

    pub fn parse_keys(content: &str) -> Vec<PrivateKey> {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(i, line)| {
                let key = PrivateKey::parse(line);
                if key.is_none() {
                    debug!("Skipping malformed key on line {}", i + 1);
                }
                key
            })
            .collect()
    }
}
