//! Everything a script invocation resolves once up front: network, config, signing client.

use std::path::PathBuf;

use alloy::primitives::Address;
use tracing::info;

use crate::{
    config::Config,
    constants::DEPLOYMENTS_FILE,
    deploy::{history::DeploymentHistory, verify::SourceVerifier},
    errors::ScriptError,
    network::{get_account, Network},
    tx::client::{create_rpc_provider, RpcProvider},
};

/// Where to connect and with which account
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Network name, the configured default when `None`
    pub network: Option<String>,
    /// RPC URL overriding the configured one
    pub rpc_url: Option<String>,
    /// Index of the local test account
    pub account_index: u32,
    /// Keystore id on live networks
    pub account_id: Option<String>,
}

/// A connected script session
pub struct Session {
    /// Network of the session
    pub network: Network,
    /// Loaded configuration
    pub config: Config,
    /// Client signing with `account`
    pub client: RpcProvider,
    /// Signing account
    pub account: Address,
    /// Deployments on every network
    pub history: DeploymentHistory,
}

impl Session {
    /// Resolve the network and account, then connect
    pub async fn connect(config: Config, options: SessionOptions) -> Result<Session, ScriptError> {
        let network = Network::new(
            options
                .network
                .unwrap_or_else(|| config.project.default_network.clone()),
        );
        info!("Current active network is {}.", network.name);

        let signer = get_account(
            &network,
            &config,
            options.account_index,
            options.account_id.as_deref(),
        )?;
        let account = signer.address();
        info!("Using account {}", account);

        let rpc_url = network.rpc_url(&config, options.rpc_url.as_deref())?;
        let client = create_rpc_provider(&rpc_url, signer).await?;

        let history = DeploymentHistory::load(
            PathBuf::from(&config.project.build_dir).join(DEPLOYMENTS_FILE),
            &network.name,
        )?;

        Ok(Session {
            network,
            config,
            client,
            account,
            history,
        })
    }

    /// Directory of the artifacts and the history
    pub fn build_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.project.build_dir)
    }

    /// The explorer client, when deployments on this network publish their source
    pub fn source_verifier(&self) -> Result<Option<SourceVerifier>, ScriptError> {
        if !self.config.verify(&self.network.name) {
            return Ok(None);
        }
        match self.config.explorer(&self.network.name)? {
            Some((api_url, api_key)) => Ok(Some(SourceVerifier::new(api_url, api_key))),
            None => Err(ScriptError::Config(format!(
                "verify is enabled for {} but explorer or explorer_api_key is missing",
                self.network.name
            ))),
        }
    }
}
