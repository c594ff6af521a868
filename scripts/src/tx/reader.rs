use alloy::{
    primitives::{Address, U256},
    providers::Provider,
};

use crate::{
    errors::ScriptError,
    tx::{abi::IERC20, client::RpcProvider},
};

/// Get the symbol of an ERC20 token
pub async fn token_symbol(token: Address, client: &RpcProvider) -> Result<String, ScriptError> {
    // Build our contract
    let contract = IERC20::new(token, client.clone());

    // Read the smart contract
    let symbol = contract
        .symbol()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(symbol._0)
}

/// Get the ERC20 balance of `holder`
pub async fn token_balance(
    token: Address,
    holder: Address,
    client: &RpcProvider,
) -> Result<U256, ScriptError> {
    let contract = IERC20::new(token, client.clone());

    let balance = contract
        .balanceOf(holder)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(balance._0)
}

/// Whether some code is deployed at `address`
pub async fn has_code(address: Address, client: &RpcProvider) -> Result<bool, ScriptError> {
    let code = client
        .get_code_at(address)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(!code.is_empty())
}
