use core_logic::{ConfigError, ProxyManager, WalletManager};
use ethers::signers::{LocalWallet, Signer};
use std::fs;
use tempfile::tempdir;

const KEY_A: &str = "4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d";
const KEY_B: &str = "0x8da4ef21b864d2cc526dbdb2a120bd2874c36c9d0a1fb7f8c63d7f7a8b41de8f";

#[test]
fn test_load_keys_normalizes_and_filters() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wallets.txt");
    let content = format!("{}\n\n   \nnot a key\n{}\n{}ff\n", KEY_A, KEY_B, KEY_A);
    fs::write(&path, content).unwrap();

    let keys = WalletManager::load_keys(&path).unwrap();

    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].expose(), format!("0x{}", KEY_A));
    assert_eq!(keys[1].expose(), KEY_B);
    assert!(keys.iter().all(|k| k.expose().starts_with("0x")));
}

#[test]
fn test_normalized_key_is_accepted_by_signer() {
    let keys = WalletManager::parse_keys(KEY_A);
    let wallet: LocalWallet = keys[0].expose().parse().unwrap();

    assert_eq!(
        format!("{:?}", wallet.address()),
        "0x90f8bf6a479f320ead074411a4b0e7944ea8c9c1"
    );
}

#[test]
fn test_load_keys_missing_file() {
    let dir = tempdir().unwrap();
    let err = WalletManager::load_keys(dir.path().join("nope.txt")).unwrap_err();

    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn test_load_keys_without_valid_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wallets.txt");
    fs::write(&path, "\n  \nxyz\n0x1234\n").unwrap();

    let err = WalletManager::load_keys(&path).unwrap_err();

    assert!(matches!(err, ConfigError::NoValidKeys { .. }));
}

#[test]
fn test_missing_proxy_file_is_not_an_error() {
    let dir = tempdir().unwrap();
    let proxies = ProxyManager::load_proxies(dir.path().join("proxies.txt")).unwrap();

    assert!(proxies.is_empty());
}

#[test]
fn test_load_proxies_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("proxies.txt");
    fs::write(
        &path,
        "http://u1:p1@10.0.0.1:8000\n\n  https://10.0.0.2:8443  \n10.0.0.3:9000\n",
    )
    .unwrap();

    let proxies = ProxyManager::load_proxies(&path).unwrap();

    assert_eq!(proxies.len(), 2);
    assert!(proxies[0].has_auth());
    assert_eq!(proxies[1].url, "https://10.0.0.2:8443");
    assert_eq!(ProxyManager::assign(&proxies, 3).unwrap(), &proxies[1]);
}
