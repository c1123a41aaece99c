use crate::config::ProxyConfig;
use crate::error::ConfigError;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub struct ProxyManager;

impl ProxyManager {
    pub const PROXY_FILE: &'static str = "proxies.txt";

    /// Loads proxies from a flat file of `http(s)://[user:pass@]host:port` lines.
    /// A missing file means "no proxies", not an error.
    pub fn load_proxies(path: impl AsRef<Path>) -> Result<Vec<ProxyConfig>, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "{} not found. Proceeding without proxies.",
                path.display()
            );
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            msg: e.to_string(),
        })?;

        let proxies = Self::parse_proxies(&content);
        info!("Loaded {} proxies from {}", proxies.len(), path.display());
        Ok(proxies)
    }

    pub fn parse_proxies(content: &str) -> Vec<ProxyConfig> {
        let mut proxies = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || !line.starts_with("http") {
                continue;
            }

            match ProxyConfig::parse(line) {
                Ok(proxy) => proxies.push(proxy),
                Err(e) => warn!("Skipping invalid proxy line: {}", e),
            }
        }

        proxies
    }

    /// Cyclic assignment: wallet `index` is pinned to `proxies[index % len]`.
    pub fn assign(proxies: &[ProxyConfig], index: usize) -> Option<&ProxyConfig> {
        if proxies.is_empty() {
            None
        } else {
            proxies.get(index % proxies.len())
        }
    }
}
