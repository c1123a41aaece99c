use async_trait::async_trait;
use core_logic::NetworkError;
use ethers::types::{Address, Bytes, TransactionReceipt, TxHash, U256};

/// Everything the deploy and transfer flow needs from a signing chain client.
///
/// Implemented by [`super::WalletClient`] over JSON-RPC; tests provide an
/// in-memory chain.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the signing key.
    fn address(&self) -> Address;

    fn chain_id(&self) -> u64;

    /// Native currency balance of [`ChainClient::address`], in wei.
    async fn native_balance(&self) -> Result<U256, NetworkError>;

    /// Read-only `eth_call`.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, NetworkError>;

    /// Signs and submits a transaction. `to: None` creates a contract.
    async fn send_transaction(
        &self,
        to: Option<Address>,
        data: Bytes,
        gas_limit: Option<U256>,
    ) -> Result<TxHash, NetworkError>;

    /// Blocks until the transaction is mined. Reverted and dropped
    /// transactions are errors.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt, NetworkError>;
}
