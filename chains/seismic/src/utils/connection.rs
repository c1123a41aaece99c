use super::client::ChainClient;
use async_trait::async_trait;
use core_logic::{ConfigError, NetworkError, PrivateKey, ProxyConfig, WalletError};
use ethers::middleware::SignerMiddleware;
use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;
use reqwest::Client;
use std::fmt;
use tracing::debug;

/// How RPC traffic leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Direct,
    Proxied(ProxyConfig),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Direct => f.write_str("None"),
            Route::Proxied(proxy) => f.write_str(&proxy.redacted()),
        }
    }
}

/// A JSON-RPC provider bound to one chain id, optionally tunneled through a
/// proxy for every request it makes.
#[derive(Debug, Clone)]
pub struct Connection {
    provider: Provider<Http>,
    route: Route,
    chain_id: u64,
    endpoint: String,
}

impl Connection {
    pub fn open(
        rpc_url: &str,
        chain_id: u64,
        proxy: Option<&ProxyConfig>,
    ) -> Result<Self, ConfigError> {
        let url = reqwest::Url::parse(rpc_url).map_err(|_| ConfigError::InvalidRpcUrl {
            url: rpc_url.to_string(),
        })?;

        let mut client_builder = Client::builder();
        if let Some(proxy_conf) = proxy {
            let mut proxy = reqwest::Proxy::all(&proxy_conf.url).map_err(|e| {
                ConfigError::InvalidProxyUrl {
                    url: proxy_conf.redacted(),
                    reason: e.to_string(),
                }
            })?;
            if let (Some(u), Some(p)) = (&proxy_conf.username, &proxy_conf.password) {
                proxy = proxy.basic_auth(u, p);
            }
            client_builder = client_builder.proxy(proxy);
        }
        let client = client_builder.build().map_err(|e| ConfigError::InvalidValue {
            field: "http_client".to_string(),
            reason: e.to_string(),
        })?;

        let route = match proxy {
            Some(p) => Route::Proxied(p.clone()),
            None => Route::Direct,
        };
        debug!("Opened connection to {} via {}", rpc_url, route);

        Ok(Self {
            provider: Provider::new(Http::new_with_client(url, client)),
            route,
            chain_id,
            endpoint: rpc_url.to_string(),
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn provider(&self) -> &Provider<Http> {
        &self.provider
    }

    /// Tags a failed call with the route it took.
    fn network_error(&self, reason: impl fmt::Display) -> NetworkError {
        match &self.route {
            Route::Direct => NetworkError::Rpc {
                endpoint: self.endpoint.clone(),
                reason: reason.to_string(),
            },
            Route::Proxied(proxy) => NetworkError::Proxy {
                proxy: proxy.redacted(),
                reason: reason.to_string(),
            },
        }
    }
}

/// A private key bound to its own [`Connection`].
#[derive(Debug, Clone)]
pub struct WalletClient {
    connection: Connection,
    signer: SignerMiddleware<Provider<Http>, LocalWallet>,
}

impl WalletClient {
    pub fn new(connection: Connection, key: &PrivateKey, index: usize) -> Result<Self, WalletError> {
        let wallet = key
            .expose()
            .parse::<LocalWallet>()
            .map_err(|e| WalletError::RejectedKey {
                index: index + 1,
                reason: e.to_string(),
            })?
            .with_chain_id(connection.chain_id());

        let signer = SignerMiddleware::new(connection.provider().clone(), wallet);
        Ok(Self { connection, signer })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

#[async_trait]
impl ChainClient for WalletClient {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn chain_id(&self) -> u64 {
        self.connection.chain_id()
    }

    async fn native_balance(&self) -> Result<U256, NetworkError> {
        self.connection
            .provider()
            .get_balance(self.address(), None)
            .await
            .map_err(|e| self.connection.network_error(e))
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, NetworkError> {
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        self.connection
            .provider()
            .call(&tx, None)
            .await
            .map_err(|e| self.connection.network_error(e))
    }

    async fn send_transaction(
        &self,
        to: Option<Address>,
        data: Bytes,
        gas_limit: Option<U256>,
    ) -> Result<TxHash, NetworkError> {
        let mut tx = TransactionRequest::new().from(self.address()).data(data);
        if let Some(to) = to {
            tx = tx.to(to);
        }
        if let Some(gas) = gas_limit {
            tx = tx.gas(gas);
        }

        let pending_tx = self
            .signer
            .send_transaction(tx, None)
            .await
            .map_err(|e| self.connection.network_error(e))?;
        Ok(pending_tx.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt, NetworkError> {
        let receipt = PendingTransaction::new(tx_hash, self.connection.provider())
            .await
            .map_err(|e| self.connection.network_error(e))?
            .ok_or_else(|| NetworkError::TransactionDropped {
                tx_hash: format!("{:?}", tx_hash),
            })?;

        if receipt.status == Some(U64::zero()) {
            return Err(NetworkError::TransactionReverted {
                tx_hash: format!("{:?}", tx_hash),
            });
        }
        Ok(receipt)
    }
}
