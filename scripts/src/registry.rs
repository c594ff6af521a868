//! Resolve logical contract names to addresses: mocks on local chains, configured
//! addresses everywhere else.

use alloy::primitives::Address;
use tracing::warn;

use crate::{
    deploy::mocks::{contract_name_to_mock, deploy_contract_mocks},
    errors::ScriptError,
    network::NetworkKind,
    session::Session,
    tx::reader::has_code,
};

/// Resolve `contract_name` for the active network.
///
/// On non forked local chains the whole mock bundle is deployed the first time
/// a mock is requested, then the latest deployment is returned.
pub async fn get_contract(session: &mut Session, contract_name: &str) -> Result<Address, ScriptError> {
    let not_found = ScriptError::ContractNotFound {
        name: contract_name.to_string(),
        network: session.network.name.clone(),
    };

    if session.network.kind() == NetworkKind::NonForkedLocal {
        let Some(mock) = contract_name_to_mock(contract_name) else {
            warn!(
                "{} contract mock not found for {} network. Add it to contract_name_to_mock.",
                contract_name, session.network.name
            );
            return Err(not_found);
        };

        let artifact_name = mock.artifact_name();
        if !has_live_deployment(session, artifact_name).await? {
            deploy_contract_mocks(session).await?;
        }
        return session.history.latest(artifact_name).ok_or(not_found);
    }

    session
        .config
        .get_contract_address(contract_name, &session.network.name)
        .map_err(|_| {
            warn!(
                "{} contract address not found for {} network. Add it to networks.{}.contracts in the config.",
                contract_name, session.network.name, session.network.name
            );
            not_found
        })
}

/// A recorded deployment that still has code; local chains forget everything on restart
async fn has_live_deployment(session: &Session, artifact_name: &str) -> Result<bool, ScriptError> {
    match session.history.latest(artifact_name) {
        Some(address) => has_code(address, &session.client).await,
        None => Ok(false),
    }
}
