use alloy::{primitives::Address, providers::Provider};
use ethers::{
    types::{H160, U256 as EthersU256},
    utils::get_contract_address,
};
use tracing::{info, warn};

use crate::{
    deploy::artifacts::Artifact,
    errors::ScriptError,
    session::Session,
    tx::sender::send_deployment,
};

/// Deploy the artifact `contract_name`, recording it in the history under `history_key`.
///
/// Source is published when `publish_source` is set and the network enables verification.
pub async fn deploy_contract(
    session: &mut Session,
    contract_name: &str,
    history_key: &str,
    constructor_args: Vec<u8>,
    publish_source: bool,
) -> Result<Address, ScriptError> {
    let artifact = Artifact::load(&session.build_dir(), contract_name)?;

    // Predict the contract address
    let predicted = predict_contract_address(session).await?;
    info!("Deploying {} to {:#x}...", contract_name, predicted);

    let deployed = send_deployment(
        &session.client,
        artifact.deploy_code(&constructor_args),
        contract_name,
    )
    .await?;
    if deployed != predicted {
        warn!(
            "{} deployed at {:#x} instead of the predicted {:#x}",
            contract_name, deployed, predicted
        );
    }
    session.history.record(history_key, deployed)?;
    info!("{} deployed at {:#x}", contract_name, deployed);

    if publish_source {
        if let Some(verifier) = session.source_verifier()? {
            verifier
                .publish_source(&artifact, deployed, &constructor_args)
                .await?;
        }
    }

    Ok(deployed)
}

/// Predict the address of the next contract created by the session account
async fn predict_contract_address(session: &Session) -> Result<Address, ScriptError> {
    // Get the signer nonce
    let signer_nonce = session
        .client
        .get_transaction_count(session.account)
        .await
        .map_err(|e| ScriptError::NonceFetching(e.to_string()))?;

    let predicted = get_contract_address(
        H160::from_slice(session.account.as_slice()),
        EthersU256::from(signer_nonce),
    );

    Ok(Address::from_slice(predicted.as_bytes()))
}
