use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{
        fillers::{ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller},
        Identity, Provider, ProviderBuilder, ReqwestProvider,
    },
    signers::local::PrivateKeySigner,
};
use reqwest::{Client, Url};
use tracing::info;

use crate::errors::ScriptError;

/// Re-export from alloy recommend filter
type RecommendFiller =
    JoinFill<JoinFill<JoinFill<Identity, GasFiller>, NonceFiller>, ChainIdFiller>;

/// HTTP transport shared by every provider
pub type HttpTransport = alloy::transports::http::Http<Client>;

/// A provider that signs with a local account & interfaces with the RPC endpoint over HTTP
pub type RpcProvider = FillProvider<
    JoinFill<RecommendFiller, WalletFiller<EthereumWallet>>,
    ReqwestProvider,
    HttpTransport,
    Ethereum,
>;

/// Read-only provider, used for price lookups on another network
pub type ReadProvider = ReqwestProvider;

/// Build a signing client for the given account on the given RPC endpoint
pub async fn create_rpc_provider(
    rpc_url: &str,
    account: PrivateKeySigner,
) -> Result<RpcProvider, ScriptError> {
    let url = parse_rpc_url(rpc_url)?;
    let wallet = EthereumWallet::from(account);

    // Create our provider with the rpc client + signer
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(wallet)
        .on_http(url);

    // Fetch chain id, doubles as a connectivity check
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    info!("Build client on chain ID: {}", chain_id);

    Ok(provider)
}

/// Build a read-only client on the given RPC endpoint
pub fn create_read_provider(rpc_url: &str) -> Result<ReadProvider, ScriptError> {
    Ok(ProviderBuilder::new().on_http(parse_rpc_url(rpc_url)?))
}

/// Parse and check an RPC URL
fn parse_rpc_url(rpc_url: &str) -> Result<Url, ScriptError> {
    rpc_url
        .parse::<Url>()
        .map_err(|e| ScriptError::ClientInitialization(format!("{}: {}", rpc_url, e)))
}
