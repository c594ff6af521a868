use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxHash, U256},
    providers::Provider,
    rpc::types::eth::{TransactionReceipt, TransactionRequest},
    sol_types::SolCall,
};
use tracing::info;

use crate::{constants::REQUIRED_CONFIRMATIONS, errors::ScriptError, tx::client::RpcProvider};

/// Call a contract method and wait for the transaction to be confirmed
pub async fn send_call<C: SolCall>(
    client: &RpcProvider,
    contract: Address,
    call: &C,
) -> Result<TxHash, ScriptError> {
    // Build the tx
    let tx_request = TransactionRequest::default()
        .to(contract)
        .with_call(call)
        .with_value(U256::from(0));

    let receipt = send_and_confirm(client, tx_request, C::SIGNATURE).await?;

    Ok(receipt.transaction_hash)
}

/// Send a contract creation transaction, returning the created address
pub async fn send_deployment(
    client: &RpcProvider,
    deploy_code: Bytes,
    contract_name: &str,
) -> Result<Address, ScriptError> {
    let tx_request = TransactionRequest::default().with_deploy_code(deploy_code);

    let receipt = send_and_confirm(client, tx_request, contract_name)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "no contract address in receipt of {}",
            receipt.transaction_hash
        ))
    })
}

/// Send a transaction, block until it has the required confirmations, fail on revert
async fn send_and_confirm(
    client: &RpcProvider,
    tx_request: TransactionRequest,
    label: &str,
) -> Result<TransactionReceipt, ScriptError> {
    // Send it
    let pending_tx = client
        .send_transaction(tx_request)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    info!("Pending {} transaction... {}", label, pending_tx.tx_hash());

    // Wait for the transaction to be included.
    let receipt = pending_tx
        .with_required_confirmations(REQUIRED_CONFIRMATIONS)
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    if !receipt.status() {
        return Err(ScriptError::ContractInteraction(format!(
            "{} transaction {} reverted",
            label, receipt.transaction_hash
        )));
    }

    info!(
        "{} tx done on block: {}",
        label,
        receipt
            .block_number
            .map(|block| block.to_string())
            .unwrap_or_else(|| "pending".to_string())
    );

    Ok(receipt)
}
