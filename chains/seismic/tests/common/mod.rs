//! In-memory chain and compiler doubles shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use core_logic::{NetworkError, PrivateKey, ProxyConfig};
use ethers::abi::{self, Abi, ParamType, Token};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, TransactionReceipt, TxHash, H256, U256, U64};
use ethers::utils::{get_contract_address, id, keccak256};
use seismic_project::error::{DeployError, RunError};
use seismic_project::registry::{build_wallets, WalletContext};
use seismic_project::utils::{ChainClient, CompiledContract, ContractCompiler};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const CHAIN_ID: u64 = 5124;

pub const KEY_A: &str = "0x4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d";
pub const KEY_B: &str = "0x6cbed15c793ce57650b9877cf6fa156fbef513c4e6134f022a85b1ffdd59b2a1";
pub const KEY_C: &str = "0x6370fd033278c143179d81c5526140625662b8daa446c22ee2d73db3707e620c";

/// Creation-code markers the in-memory chain uses to tell the two
/// constructor shapes apart.
pub const FIXED_CODE: [u8; 2] = [0xfe, 0x01];
pub const CUSTOM_CODE: [u8; 2] = [0xfe, 0x02];

pub fn key(raw: &str) -> PrivateKey {
    PrivateKey::parse(raw).unwrap()
}

pub fn address_of(key: &PrivateKey) -> Address {
    key.expose().parse::<LocalWallet>().unwrap().address()
}

pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::exp10(18)
}

#[derive(Debug, Clone)]
pub struct SentTx {
    pub from: Address,
    pub to: Option<Address>,
    pub data: Bytes,
    pub gas_limit: Option<U256>,
}

#[derive(Debug, Default)]
struct TokenLedger {
    decimals: u8,
    total_supply: U256,
    balances: HashMap<Address, U256>,
}

#[derive(Debug, Default)]
struct ChainState {
    native: HashMap<Address, U256>,
    nonces: HashMap<Address, U256>,
    tokens: HashMap<Address, TokenLedger>,
    receipts: HashMap<TxHash, TransactionReceipt>,
    sent: Vec<SentTx>,
    send_attempts: usize,
    failing_sends: HashSet<usize>,
    dropped_sends: HashSet<usize>,
    failing_balances: HashSet<Address>,
}

/// A single-node chain that executes the token contract natively.
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fund(&self, address: Address, wei: U256) {
        self.state.lock().unwrap().native.insert(address, wei);
    }

    /// The `n`-th submission (zero-based, counting every send) fails at the
    /// transport.
    pub fn fail_send(&self, n: usize) {
        self.state.lock().unwrap().failing_sends.insert(n);
    }

    /// The `n`-th submission is accepted but never mined.
    pub fn drop_send(&self, n: usize) {
        self.state.lock().unwrap().dropped_sends.insert(n);
    }

    /// Balance lookups for `address` fail at the RPC.
    pub fn fail_balance(&self, address: Address) {
        self.state.lock().unwrap().failing_balances.insert(address);
    }

    pub fn client(&self, key: &PrivateKey) -> MockClient {
        MockClient {
            address: address_of(key),
            state: self.state.clone(),
        }
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn token_balance(&self, token: Address, holder: Address) -> U256 {
        let state = self.state.lock().unwrap();
        state
            .tokens
            .get(&token)
            .and_then(|t| t.balances.get(&holder).copied())
            .unwrap_or_default()
    }

    pub fn total_supply(&self, token: Address) -> U256 {
        let state = self.state.lock().unwrap();
        state
            .tokens
            .get(&token)
            .map(|t| t.total_supply)
            .unwrap_or_default()
    }

    pub fn token_decimals(&self, token: Address) -> Option<u8> {
        let state = self.state.lock().unwrap();
        state.tokens.get(&token).map(|t| t.decimals)
    }

    /// Builds a registry over this chain with the real builder.
    pub async fn wallets(
        &self,
        keys: &[PrivateKey],
        proxies: &[ProxyConfig],
        with_profiles: bool,
    ) -> Vec<WalletContext<MockClient>> {
        let mut rng = rand::thread_rng();
        build_wallets(
            keys,
            proxies,
            |_, key, _| Ok::<_, RunError>(self.client(key)),
            &mut rng,
            with_profiles,
        )
        .await
        .unwrap()
    }
}

#[derive(Debug, Clone)]
pub struct MockClient {
    address: Address,
    state: Arc<Mutex<ChainState>>,
}

fn receipt(tx_hash: TxHash, success: bool, contract_address: Option<Address>) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: tx_hash,
        status: Some(U64::from(success as u64)),
        contract_address,
        ..Default::default()
    }
}

fn decode_constructor(data: &[u8]) -> Option<(u8, U256)> {
    let (custom, args) = if data.starts_with(&FIXED_CODE) {
        (false, &data[FIXED_CODE.len()..])
    } else if data.starts_with(&CUSTOM_CODE) {
        (true, &data[CUSTOM_CODE.len()..])
    } else {
        return None;
    };

    let mut kinds = vec![ParamType::String, ParamType::String];
    if custom {
        kinds.push(ParamType::Uint(8));
    }
    kinds.push(ParamType::Uint(256));

    let mut tokens = abi::decode(&kinds, args).ok()?.into_iter().skip(2);
    let decimals = if custom {
        tokens.next()?.into_uint()?.as_u32() as u8
    } else {
        18
    };
    let supply = tokens.next()?.into_uint()?;
    Some((decimals, supply))
}

impl ChainState {
    fn execute(&mut self, from: Address, to: Option<Address>, data: &[u8], nonce: U256) -> (bool, Option<Address>) {
        match to {
            None => match decode_constructor(data) {
                Some((decimals, supply)) => {
                    let contract = get_contract_address(from, nonce);
                    let total_supply = supply * U256::exp10(decimals as usize);
                    let mut ledger = TokenLedger {
                        decimals,
                        total_supply,
                        balances: HashMap::new(),
                    };
                    ledger.balances.insert(from, total_supply);
                    self.tokens.insert(contract, ledger);
                    (true, Some(contract))
                }
                None => (false, None),
            },
            Some(token) => {
                let Some(ledger) = self.tokens.get_mut(&token) else {
                    return (false, None);
                };
                if data.len() < 4 || data[..4] != id("transfer(address,uint256)") {
                    return (false, None);
                }
                let Ok(args) = abi::decode(&[ParamType::Address, ParamType::Uint(256)], &data[4..]) else {
                    return (false, None);
                };
                let (Some(recipient), Some(value)) =
                    (args[0].clone().into_address(), args[1].clone().into_uint())
                else {
                    return (false, None);
                };
                let sender_balance = ledger.balances.get(&from).copied().unwrap_or_default();
                if sender_balance < value {
                    return (false, None);
                }
                ledger.balances.insert(from, sender_balance - value);
                *ledger.balances.entry(recipient).or_default() += value;
                (true, None)
            }
        }
    }
}

#[async_trait]
impl ChainClient for MockClient {
    fn address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> u64 {
        CHAIN_ID
    }

    async fn native_balance(&self) -> Result<U256, NetworkError> {
        let state = self.state.lock().unwrap();
        if state.failing_balances.contains(&self.address) {
            return Err(NetworkError::Rpc {
                endpoint: "mock".to_string(),
                reason: "balance unavailable".to_string(),
            });
        }
        Ok(state.native.get(&self.address).copied().unwrap_or_default())
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, NetworkError> {
        let state = self.state.lock().unwrap();
        let ledger = state.tokens.get(&to).ok_or_else(|| NetworkError::Rpc {
            endpoint: "mock".into(),
            reason: format!("no contract at {:?}", to),
        })?;

        let selector = &data[..4.min(data.len())];
        let value = if selector == id("totalSupply()") {
            ledger.total_supply
        } else if selector == id("decimals()") {
            U256::from(ledger.decimals)
        } else if selector == id("balanceOf(address)") {
            let holder = abi::decode(&[ParamType::Address], &data[4..])
                .ok()
                .and_then(|t| t.into_iter().next())
                .and_then(Token::into_address)
                .ok_or_else(|| NetworkError::InvalidResponse {
                    endpoint: "mock".into(),
                    reason: "malformed balanceOf argument".into(),
                })?;
            ledger.balances.get(&holder).copied().unwrap_or_default()
        } else {
            return Err(NetworkError::Rpc {
                endpoint: "mock".into(),
                reason: "execution reverted".into(),
            });
        };
        Ok(Bytes::from(abi::encode(&[Token::Uint(value)])))
    }

    async fn send_transaction(
        &self,
        to: Option<Address>,
        data: Bytes,
        gas_limit: Option<U256>,
    ) -> Result<TxHash, NetworkError> {
        let mut state = self.state.lock().unwrap();
        let attempt = state.send_attempts;
        state.send_attempts += 1;
        if state.failing_sends.contains(&attempt) {
            return Err(NetworkError::Rpc {
                endpoint: "mock".into(),
                reason: "connection reset".into(),
            });
        }

        let nonce = state.nonces.get(&self.address).copied().unwrap_or_default();
        state.nonces.insert(self.address, nonce + 1);

        let mut preimage = self.address.as_bytes().to_vec();
        preimage.extend_from_slice(&nonce.as_u64().to_be_bytes());
        let tx_hash = H256::from(keccak256(preimage));

        state.sent.push(SentTx {
            from: self.address,
            to,
            data: data.clone(),
            gas_limit,
        });

        if state.dropped_sends.contains(&attempt) {
            return Ok(tx_hash);
        }
        let (success, contract) = state.execute(self.address, to, &data, nonce);
        state.receipts.insert(tx_hash, receipt(tx_hash, success, contract));
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt, NetworkError> {
        let state = self.state.lock().unwrap();
        let receipt = state
            .receipts
            .get(&tx_hash)
            .cloned()
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

const FIXED_CONSTRUCTOR: &str = r#"{"type":"constructor","stateMutability":"nonpayable","inputs":[
    {"name":"_name","type":"string"},
    {"name":"_symbol","type":"string"},
    {"name":"_totalSupply","type":"uint256"}]}"#;

const CUSTOM_CONSTRUCTOR: &str = r#"{"type":"constructor","stateMutability":"nonpayable","inputs":[
    {"name":"_name","type":"string"},
    {"name":"_symbol","type":"string"},
    {"name":"_decimals","type":"uint8"},
    {"name":"_totalSupply","type":"uint256"}]}"#;

const TOKEN_FUNCTIONS: &str = r#"
    {"type":"function","name":"totalSupply","stateMutability":"view","inputs":[],
     "outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"decimals","stateMutability":"view","inputs":[],
     "outputs":[{"name":"","type":"uint8"}]},
    {"type":"function","name":"balanceOf","stateMutability":"view",
     "inputs":[{"name":"","type":"address"}],
     "outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"transfer","stateMutability":"nonpayable",
     "inputs":[{"name":"to","type":"address"},{"name":"value","type":"uint256"}],
     "outputs":[{"name":"success","type":"bool"}]}"#;

pub fn token_abi(custom_decimals: bool) -> Abi {
    let constructor = if custom_decimals {
        CUSTOM_CONSTRUCTOR
    } else {
        FIXED_CONSTRUCTOR
    };
    serde_json::from_str(&format!("[{},{}]", constructor, TOKEN_FUNCTIONS)).unwrap()
}

/// Reads the written source and hands back canned artifacts matching its
/// constructor shape.
#[derive(Debug, Clone, Default)]
pub struct StubCompiler {
    compiled: Arc<Mutex<Vec<PathBuf>>>,
}

impl StubCompiler {
    pub fn compiled(&self) -> Vec<PathBuf> {
        self.compiled.lock().unwrap().clone()
    }
}

impl ContractCompiler for StubCompiler {
    fn compile(&self, source_path: &Path, contract_name: &str) -> Result<CompiledContract, DeployError> {
        let source = fs::read_to_string(source_path).map_err(|e| DeployError::Io {
            path: source_path.display().to_string(),
            msg: e.to_string(),
        })?;
        if !source.contains(&format!("contract {}", contract_name)) {
            return Err(DeployError::ContractNotFound {
                contract: contract_name.to_string(),
            });
        }
        self.compiled.lock().unwrap().push(source_path.to_path_buf());

        let custom = source.contains("uint8 _decimals");
        let code = if custom { CUSTOM_CODE } else { FIXED_CODE };
        Ok(CompiledContract {
            abi: token_abi(custom),
            bytecode: Bytes::from(code.to_vec()),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct FailingCompiler;

impl ContractCompiler for FailingCompiler {
    fn compile(&self, _: &Path, _: &str) -> Result<CompiledContract, DeployError> {
        Err(DeployError::Compilation {
            diagnostics: vec!["ParserError: Expected ';' but got '}'".to_string()],
        })
    }
}

pub fn output(console: &seismic_project::ui::Console<Vec<u8>>) -> String {
    String::from_utf8_lossy(console.get_ref()).into_owned()
}
