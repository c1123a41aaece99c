use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Parses `http(s)://[user:pass@]host:port`.
    ///
    /// Credentials are split out of the user-info component so the stored
    /// `url` never carries them; callers attach them as basic auth.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidProxyUrl {
            url: redact_userinfo(raw),
            reason: reason.to_string(),
        };

        let parsed = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        let host = parsed.host_str().ok_or_else(|| invalid("missing host"))?;

        let username = Some(parsed.username().to_string()).filter(|u| !u.is_empty());
        let password = parsed.password().map(str::to_string);

        // Rebuilt from parts so default ports stay explicit.
        let url = match parsed.port_or_known_default() {
            Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
            None => format!("{}://{}", parsed.scheme(), host),
        };

        Ok(Self {
            url,
            username,
            password,
        })
    }

    pub fn has_auth(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Display form for logs and the console, password masked.
    pub fn redacted(&self) -> String {
        match (&self.username, &self.password) {
            (Some(user), Some(_)) => match self.url.split_once("://") {
                Some((scheme, rest)) => format!("{}://{}:***@{}", scheme, user, rest),
                None => self.url.clone(),
            },
            _ => self.url.clone(),
        }
    }
}

fn redact_userinfo(raw: &str) -> String {
    match (raw.split_once("://"), raw.rfind('@')) {
        (Some((scheme, _)), Some(at)) => format!("{}://***@{}", scheme, &raw[at + 1..]),
        _ => raw.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub rpc_endpoint: String,
    pub chain_id: u64,
}
