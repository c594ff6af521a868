//! Project configuration: network contract addresses, wallets, named addresses.

use std::{collections::BTreeMap, env, fs, path::Path};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_LOCAL_MNEMONIC, DEFAULT_PRICE_API_URL, DEFAULT_PRICE_NETWORK},
    errors::ScriptError,
};

/// The whole configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Paths and endpoints
    #[serde(default)]
    pub project: ProjectConfig,
    /// Signing keys by network name
    #[serde(default)]
    pub wallets: BTreeMap<String, WalletConfig>,
    /// Named constant addresses, e.g. `zero`
    #[serde(default)]
    pub addresses: BTreeMap<String, String>,
    /// Network settings by name
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
}

/// Paths and endpoints used by the scripts themselves
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Network used when none is given
    pub default_network: String,
    /// Directory holding `contracts/<Name>.json` artifacts and the deployment history
    pub build_dir: String,
    /// Front end project receiving the build and the token list
    pub front_end_dir: String,
    /// Base URL of the token price API
    pub price_api_url: String,
    /// Network whose token addresses are priced
    pub price_network: String,
    /// Directory of the encrypted keystores
    pub keystore_dir: String,
    /// Mnemonic of the local node test accounts
    pub local_mnemonic: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_network: "development".to_string(),
            build_dir: "./build".to_string(),
            front_end_dir: "../front_end".to_string(),
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            price_network: DEFAULT_PRICE_NETWORK.to_string(),
            keystore_dir: "./keystore".to_string(),
            local_mnemonic: DEFAULT_LOCAL_MNEMONIC.to_string(),
        }
    }
}

/// Signing key of a network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Hex private key, usually `${PRIVATE_KEY}`
    pub private_key: String,
}

/// Per network settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// RPC endpoint, the local default for local networks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    /// Publish contract source on the block explorer after each deployment
    #[serde(default)]
    pub verify: bool,
    /// Explorer API URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer: Option<String>,
    /// Explorer API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_api_key: Option<String>,
    /// Third party contract addresses by name
    #[serde(default)]
    pub contracts: BTreeMap<String, String>,
}

impl Config {
    /// Load and parse the TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ScriptError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ScriptError::Config(format!("{}: {}", path.display(), e)))?;
        Config::parse(&content)
    }

    /// Parse a TOML configuration document
    pub fn parse(content: &str) -> Result<Config, ScriptError> {
        toml::from_str(content).map_err(|e| ScriptError::Config(e.to_string()))
    }

    /// Settings of the given network
    pub fn network(&self, network_name: &str) -> Result<&NetworkConfig, ScriptError> {
        self.networks.get(network_name).ok_or_else(|| {
            ScriptError::Config(format!("network {} is not configured", network_name))
        })
    }

    /// Whether deployments on this network should publish their source
    pub fn verify(&self, network_name: &str) -> bool {
        self.networks
            .get(network_name)
            .map(|network| network.verify)
            .unwrap_or(false)
    }

    /// A named constant address from `[addresses]`
    pub fn get_address(&self, address_name: &str) -> Result<Address, ScriptError> {
        let raw = self.addresses.get(address_name).ok_or_else(|| {
            ScriptError::Config(format!("address {} is not configured", address_name))
        })?;
        parse_address(&expand_env(raw)?)
    }

    /// The configured address of a contract on the given network
    pub fn get_contract_address(
        &self,
        contract_name: &str,
        network_name: &str,
    ) -> Result<Address, ScriptError> {
        let raw = self
            .network(network_name)?
            .contracts
            .get(contract_name)
            .ok_or_else(|| {
                ScriptError::Config(format!(
                    "contract {} is not configured for {} network",
                    contract_name, network_name
                ))
            })?;
        parse_address(&expand_env(raw)?)
    }

    /// The raw private key of a configured wallet, env references expanded
    pub fn wallet_private_key(&self, wallet_name: &str) -> Result<String, ScriptError> {
        let wallet = self.wallets.get(wallet_name).ok_or_else(|| {
            ScriptError::Config(format!("wallet {} is not configured", wallet_name))
        })?;
        expand_env(&wallet.private_key)
    }

    /// Explorer API endpoint and key of a network, if source publishing is possible there
    pub fn explorer(&self, network_name: &str) -> Result<Option<(String, String)>, ScriptError> {
        let network = self.network(network_name)?;
        match (&network.explorer, &network.explorer_api_key) {
            (Some(url), Some(key)) => Ok(Some((expand_env(url)?, expand_env(key)?))),
            _ => Ok(None),
        }
    }
}

/// Expand a `${VAR}` value from the environment, other values are returned as is
pub fn expand_env(value: &str) -> Result<String, ScriptError> {
    let trimmed = value.trim();
    match trimmed
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(var) => env::var(var)
            .map_err(|e| ScriptError::Config(format!("environment variable {}: {}", var, e))),
        None => Ok(trimmed.to_string()),
    }
}

/// Parse a hex address
pub fn parse_address(raw: &str) -> Result<Address, ScriptError> {
    raw.parse::<Address>()
        .map_err(|e| ScriptError::Config(format!("invalid address {}: {}", raw, e)))
}
