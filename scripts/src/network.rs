//! Active network classification and signing account resolution.

use std::{env, path::PathBuf};

use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use tracing::debug;

use crate::{
    config::Config,
    constants::{
        DEFAULT_LOCAL_RPC, FORKED_LOCAL_BLOCKCHAIN_ENVIRONMENTS, MAINNET_BLOCKCHAIN_ENVIRONMENTS,
        NON_FORKED_LOCAL_BLOCKCHAIN_ENVIRONMENTS,
    },
    errors::ScriptError,
};

/// How the scripts treat a network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
    /// Throwaway chain, contracts are mocked
    NonForkedLocal,
    /// Local fork of a public chain, test accounts with live addresses
    ForkedLocal,
    /// Public chain
    Live,
}

/// The network the scripts run against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    /// Name, as configured
    pub name: String,
}

impl Network {
    /// Network named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Local or live, by name
    pub fn kind(&self) -> NetworkKind {
        let name = self.name.as_str();
        if NON_FORKED_LOCAL_BLOCKCHAIN_ENVIRONMENTS.contains(&name) {
            NetworkKind::NonForkedLocal
        } else if FORKED_LOCAL_BLOCKCHAIN_ENVIRONMENTS.contains(&name) {
            NetworkKind::ForkedLocal
        } else {
            NetworkKind::Live
        }
    }

    /// Whether the network is a local chain, forked or not
    pub fn is_local(&self) -> bool {
        self.kind() != NetworkKind::Live
    }

    /// Mocks go anywhere but on a mainnet
    pub fn accepts_mocks(&self) -> bool {
        !MAINNET_BLOCKCHAIN_ENVIRONMENTS.contains(&self.name.as_str())
    }

    /// RPC endpoint: explicit override, then configuration, then the local default
    pub fn rpc_url(&self, config: &Config, rpc_override: Option<&str>) -> Result<String, ScriptError> {
        if let Some(url) = rpc_override {
            return Ok(url.to_string());
        }
        if let Some(url) = config
            .networks
            .get(&self.name)
            .and_then(|network| network.rpc_url.as_deref())
        {
            return crate::config::expand_env(url);
        }
        if self.is_local() {
            return Ok(DEFAULT_LOCAL_RPC.to_string());
        }
        Err(ScriptError::Config(format!(
            "no rpc_url configured for {} network",
            self.name
        )))
    }
}

/// Resolve the signing account for the network.
///
/// Local networks use the pre-funded test account at `index`. Otherwise a
/// keystore account is loaded when `id` is given, falling back to the
/// development wallet private key from the configuration.
pub fn get_account(
    network: &Network,
    config: &Config,
    index: u32,
    id: Option<&str>,
) -> Result<PrivateKeySigner, ScriptError> {
    if network.is_local() {
        debug!("Using local test account #{}", index);
        return local_account(&config.project.local_mnemonic, index);
    }
    if let Some(id) = id {
        return keystore_account(&config.project.keystore_dir, id);
    }
    config
        .wallet_private_key("development")?
        .parse::<PrivateKeySigner>()
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
}

/// Derive a test account from the node mnemonic
pub fn local_account(mnemonic: &str, index: u32) -> Result<PrivateKeySigner, ScriptError> {
    MnemonicBuilder::<English>::default()
        .phrase(mnemonic)
        .index(index)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .build()
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
}

/// Decrypt `<keystore_dir>/<id>.json` with the `KEYSTORE_PASSWORD` env var
fn keystore_account(keystore_dir: &str, id: &str) -> Result<PrivateKeySigner, ScriptError> {
    let path = PathBuf::from(keystore_dir).join(format!("{id}.json"));
    let password = env::var("KEYSTORE_PASSWORD")
        .map_err(|e| ScriptError::ClientInitialization(format!("KEYSTORE_PASSWORD: {}", e)))?;
    PrivateKeySigner::decrypt_keystore(&path, password)
        .map_err(|e| ScriptError::ClientInitialization(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use alloy::primitives::Address;

    use super::*;
    use crate::constants::DEFAULT_LOCAL_MNEMONIC;

    #[test]
    fn classifies_networks() {
        assert_eq!(Network::new("development").kind(), NetworkKind::NonForkedLocal);
        assert_eq!(Network::new("hardhat").kind(), NetworkKind::NonForkedLocal);
        assert_eq!(Network::new("bsc-main-fork").kind(), NetworkKind::ForkedLocal);
        assert_eq!(Network::new("bsc-test").kind(), NetworkKind::Live);
        assert!(Network::new("mainnet-fork").is_local());
        assert!(!Network::new("bsc-main").is_local());
    }

    #[test]
    fn mocks_are_refused_on_mainnets_only() {
        assert!(Network::new("development").accepts_mocks());
        assert!(Network::new("bsc-main-fork").accepts_mocks());
        assert!(Network::new("bsc-test").accepts_mocks());
        assert!(!Network::new("bsc-main").accepts_mocks());
        assert!(!Network::new("mainnet").accepts_mocks());
    }

    #[test]
    fn rpc_url_resolution_order() {
        let config = Config::parse(
            r#"
[networks.bsc-test]
rpc_url = "https://data-seed-prebsc-1-s1.binance.org:8545"
"#,
        )
        .unwrap();
        let live = Network::new("bsc-test");
        assert_eq!(
            live.rpc_url(&config, None).unwrap(),
            "https://data-seed-prebsc-1-s1.binance.org:8545"
        );
        assert_eq!(
            live.rpc_url(&config, Some("http://localhost:9999")).unwrap(),
            "http://localhost:9999"
        );
        assert_eq!(
            Network::new("development").rpc_url(&config, None).unwrap(),
            DEFAULT_LOCAL_RPC
        );
        assert!(Network::new("bsc-main").rpc_url(&config, None).is_err());
    }

    #[test]
    fn local_accounts_match_node_accounts() {
        let first = local_account(DEFAULT_LOCAL_MNEMONIC, 0).unwrap();
        assert_eq!(
            first.address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().unwrap()
        );
        let second = local_account(DEFAULT_LOCAL_MNEMONIC, 1).unwrap();
        assert_eq!(
            second.address(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn live_network_without_wallet_fails() {
        let config = Config::parse("[networks.bsc-main]").unwrap();
        let result = get_account(&Network::new("bsc-main"), &config, 0, None);
        assert!(matches!(result, Err(ScriptError::Config(_))));
    }

    #[test]
    fn live_network_uses_configured_private_key() {
        let config = Config::parse(
            r#"
[wallets.development]
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
"#,
        )
        .unwrap();
        let account = get_account(&Network::new("bsc-main"), &config, 0, None).unwrap();
        assert_eq!(
            account.address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().unwrap()
        );
    }
}
