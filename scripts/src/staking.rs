//! Wrappers for the legacy single-contract staking deployment.

use alloy::primitives::{Address, U256};
use tracing::info;

use crate::{
    actions::Tokens,
    errors::ScriptError,
    price::MarketPrices,
    tx::{abi::ISavvyFinanceStaking, client::RpcProvider, sender::send_call},
    units::{from_wei, to_wei_f64},
};

/// Register tokens, administered by `admin`
pub async fn add_tokens(
    client: &RpcProvider,
    staking: Address,
    tokens: &Tokens,
    admin: Address,
) -> Result<(), ScriptError> {
    for (token_name, token) in tokens {
        send_call(
            client,
            staking,
            &ISavvyFinanceStaking::addTokenCall {
                token: *token,
                admin,
            },
        )
        .await?;
        info!("Added {} token.", token_name);
    }
    Ok(())
}

/// Activate every token on the staking contract
pub async fn activate_tokens(
    client: &RpcProvider,
    staking: Address,
    tokens: &Tokens,
) -> Result<(), ScriptError> {
    for (token_name, token) in tokens {
        send_call(
            client,
            staking,
            &ISavvyFinanceStaking::activateTokenCall { token: *token },
        )
        .await?;
        info!("Activated {} token.", token_name);
    }
    Ok(())
}

/// Push the market price of each token, `<name>` being its contract name on the price network
pub async fn set_token_price(
    client: &RpcProvider,
    staking: Address,
    tokens: &Tokens,
    prices: &MarketPrices<'_>,
) -> Result<(), ScriptError> {
    for (token_name, token) in tokens {
        let price = to_wei_f64(prices.configured_token_price(token_name).await?)?;
        send_call(
            client,
            staking,
            &ISavvyFinanceStaking::setTokenPriceCall {
                token: *token,
                price,
            },
        )
        .await?;

        let recorded = token_price(client, staking, *token).await?;
        info!("Updated {} token price to {}.", token_name, from_wei(recorded));
    }
    Ok(())
}

/// The price the staking contract holds for `token`
pub async fn token_price(
    client: &RpcProvider,
    staking: Address,
    token: Address,
) -> Result<U256, ScriptError> {
    let contract = ISavvyFinanceStaking::new(staking, client.clone());
    let token_data = contract
        .tokensData(token)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    Ok(token_data.price)
}
