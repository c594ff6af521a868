//! One wrapper per farm method: convert units, approve when tokens move in,
//! send, wait for the confirmation, log what happened.
//!
//! Every wrapper takes the signing client explicitly.

use alloy::primitives::{Address, U256};
use tracing::info;

use crate::{
    errors::ScriptError,
    price::MarketPrices,
    tx::{
        abi::{ISavvyFinanceFarm, IERC20},
        client::RpcProvider,
        reader::token_symbol,
        sender::send_call,
    },
    units::{from_wei, to_wei, to_wei_f64},
};

/// Farm tokens by logical name, in the order they are registered
pub type Tokens = Vec<(String, Address)>;

/// Name registered on the farm: `wbnb_busd` becomes `WBNB-BUSD`
pub fn token_display_name(token_name: &str) -> String {
    token_name.replace('_', "-").to_uppercase()
}

/// Category number: 0 for single tokens, 1 for LP tokens
pub fn token_category(token_name: &str) -> u64 {
    if token_name.contains('_') {
        1
    } else {
        0
    }
}

/// Stop charging fees to `account`
pub async fn exclude_from_fees(
    client: &RpcProvider,
    farm: Address,
    account: Address,
) -> Result<(), ScriptError> {
    send_call(client, farm, &ISavvyFinanceFarm::excludeFromFeesCall { account }).await?;
    info!("Excluded {} from fees.", account);
    Ok(())
}

/// Charge fees to `account` again
pub async fn include_in_fees(
    client: &RpcProvider,
    farm: Address,
    account: Address,
) -> Result<(), ScriptError> {
    send_call(client, farm, &ISavvyFinanceFarm::includeInFeesCall { account }).await?;
    info!("Included {} in fees.", account);
    Ok(())
}

/// Category `i` gets name `categories[i]`
pub async fn set_token_categories(
    client: &RpcProvider,
    farm: Address,
    categories: &[String],
) -> Result<(), ScriptError> {
    for (index, category) in categories.iter().enumerate() {
        send_call(
            client,
            farm,
            &ISavvyFinanceFarm::setTokenCategoryNumberToNameCall {
                categoryNumber: U256::from(index),
                categoryName: category.clone(),
            },
        )
        .await?;
        info!("Set token category {} to {}.", index, category);
    }
    Ok(())
}

/// Register tokens with no fees and no APR, reward token and admin set to `zero`
pub async fn add_tokens(
    client: &RpcProvider,
    farm: Address,
    tokens: &Tokens,
    zero: Address,
) -> Result<(), ScriptError> {
    for (token_name, token) in tokens {
        send_call(
            client,
            farm,
            &ISavvyFinanceFarm::addTokenCall {
                token: *token,
                name: token_display_name(token_name),
                category: U256::from(token_category(token_name)),
                stakeFee: U256::ZERO,
                unstakeFee: U256::ZERO,
                stakingApr: U256::ZERO,
                rewardToken: zero,
                admin: zero,
            },
        )
        .await?;
        info!("Added {} token.", token_name);
    }
    Ok(())
}

/// Activate every token
pub async fn activate_tokens(
    client: &RpcProvider,
    farm: Address,
    tokens: &Tokens,
) -> Result<(), ScriptError> {
    for (token_name, token) in tokens {
        send_call(client, farm, &ISavvyFinanceFarm::activateTokenCall { token: *token }).await?;
        info!("Activated {} token.", token_name);
    }
    Ok(())
}

/// Deactivate every token
pub async fn deactivate_tokens(
    client: &RpcProvider,
    farm: Address,
    tokens: &Tokens,
) -> Result<(), ScriptError> {
    for (token_name, token) in tokens {
        send_call(client, farm, &ISavvyFinanceFarm::deactivateTokenCall { token: *token }).await?;
        info!("Deactivated {} token.", token_name);
    }
    Ok(())
}

/// Let stakers of these tokens pick their own reward token
pub async fn enable_tokens_multi_reward(
    client: &RpcProvider,
    farm: Address,
    tokens: &Tokens,
) -> Result<(), ScriptError> {
    for (token_name, token) in tokens {
        send_call(
            client,
            farm,
            &ISavvyFinanceFarm::enableTokenMultiRewardCall { token: *token },
        )
        .await?;
        info!("Enabled {} token multi reward.", token_name);
    }
    Ok(())
}

/// Reward stakers of these tokens in the token itself
pub async fn disable_tokens_multi_reward(
    client: &RpcProvider,
    farm: Address,
    tokens: &Tokens,
) -> Result<(), ScriptError> {
    for (token_name, token) in tokens {
        send_call(
            client,
            farm,
            &ISavvyFinanceFarm::disableTokenMultiRewardCall { token: *token },
        )
        .await?;
        info!("Disabled {} token multi reward.", token_name);
    }
    Ok(())
}

/// Push market prices: single tokens from the API, LP tokens from their reserves
pub async fn set_tokens_prices(
    client: &RpcProvider,
    farm: Address,
    tokens: &Tokens,
    prices: &MarketPrices<'_>,
) -> Result<(), ScriptError> {
    for (token_name, token) in tokens {
        let price = to_wei_f64(prices.token_price(token_name).await?)?;
        set_token_price(client, farm, *token, price).await?;
        info!("Updated {} token price.", token_name);
    }
    Ok(())
}

/// Push LP token prices, each token configured on the price network as `<name>_token`
pub async fn set_lp_tokens_prices(
    client: &RpcProvider,
    farm: Address,
    tokens: &Tokens,
    prices: &MarketPrices<'_>,
) -> Result<(), ScriptError> {
    for (token_name, token) in tokens {
        let price = to_wei_f64(prices.lp_token_price(token_name).await?)?;
        set_token_price(client, farm, *token, price).await?;
        info!("Updated {} token price.", token_name);
    }
    Ok(())
}

/// Push one price, in wei
async fn set_token_price(
    client: &RpcProvider,
    farm: Address,
    token: Address,
    price: U256,
) -> Result<(), ScriptError> {
    send_call(client, farm, &ISavvyFinanceFarm::setTokenPriceCall { token, price }).await?;
    Ok(())
}

/// Reward stakers of `token` in `reward_token`
pub async fn set_token_reward_token(
    client: &RpcProvider,
    farm: Address,
    token: Address,
    reward_token: Address,
) -> Result<(), ScriptError> {
    send_call(
        client,
        farm,
        &ISavvyFinanceFarm::setTokenRewardTokenCall {
            token,
            rewardToken: reward_token,
        },
    )
    .await?;
    info!(
        "{} token reward token set to {}.",
        token_symbol(token, client).await?,
        token_symbol(reward_token, client).await?
    );
    Ok(())
}

/// Approve then deposit reward liquidity into the farm
pub async fn deposit_token(
    client: &RpcProvider,
    farm: Address,
    token: Address,
    amount: &str,
) -> Result<(), ScriptError> {
    let amount_wei = to_wei(amount)?;
    approve(client, token, farm, amount_wei).await?;
    send_call(
        client,
        farm,
        &ISavvyFinanceFarm::depositTokenCall {
            token,
            amount: amount_wei,
        },
    )
    .await?;
    info!("Deposited {} {}.", amount, token_symbol(token, client).await?);
    Ok(())
}

/// Withdraw reward liquidity of `token`
pub async fn withdraw_token(
    client: &RpcProvider,
    farm: Address,
    token: Address,
    amount: &str,
) -> Result<(), ScriptError> {
    let amount_wei = to_wei(amount)?;
    send_call(
        client,
        farm,
        &ISavvyFinanceFarm::withdrawTokenCall {
            token,
            amount: amount_wei,
        },
    )
    .await?;
    info!("Withdrew {} {}.", amount, token_symbol(token, client).await?);
    Ok(())
}

/// Reward token of the account's stake in `token`
pub async fn set_staking_reward_token(
    client: &RpcProvider,
    farm: Address,
    token: Address,
    reward_token: Address,
) -> Result<(), ScriptError> {
    send_call(
        client,
        farm,
        &ISavvyFinanceFarm::setStakingRewardTokenCall {
            token,
            rewardToken: reward_token,
        },
    )
    .await?;
    info!(
        "{} staking reward token set to {}.",
        token_symbol(token, client).await?,
        token_symbol(reward_token, client).await?
    );
    Ok(())
}

/// Approve then stake
pub async fn stake_token(
    client: &RpcProvider,
    farm: Address,
    token: Address,
    amount: &str,
) -> Result<(), ScriptError> {
    let amount_wei = to_wei(amount)?;
    approve(client, token, farm, amount_wei).await?;
    send_call(
        client,
        farm,
        &ISavvyFinanceFarm::stakeTokenCall {
            token,
            amount: amount_wei,
        },
    )
    .await?;
    info!("Staked {} {}.", amount, token_symbol(token, client).await?);
    Ok(())
}

/// Unstake a decimal amount of `token`
pub async fn unstake_token(
    client: &RpcProvider,
    farm: Address,
    token: Address,
    amount: &str,
) -> Result<(), ScriptError> {
    let amount_wei = to_wei(amount)?;
    send_call(
        client,
        farm,
        &ISavvyFinanceFarm::unstakeTokenCall {
            token,
            amount: amount_wei,
        },
    )
    .await?;
    info!("Unstaked {} {}.", amount, token_symbol(token, client).await?);
    Ok(())
}

/// Withdraw accrued rewards paid in `token`
pub async fn withdraw_staking_reward(
    client: &RpcProvider,
    farm: Address,
    reward_token: Address,
    amount: &str,
) -> Result<(), ScriptError> {
    let amount_wei = to_wei(amount)?;
    send_call(
        client,
        farm,
        &ISavvyFinanceFarm::withdrawStakingRewardCall {
            rewardToken: reward_token,
            amount: amount_wei,
        },
    )
    .await?;
    info!(
        "Withdrew {} {} reward.",
        amount,
        token_symbol(reward_token, client).await?
    );
    Ok(())
}

/// Pay out the pending staking rewards
pub async fn issue_staking_rewards(client: &RpcProvider, farm: Address) -> Result<(), ScriptError> {
    send_call(client, farm, &ISavvyFinanceFarm::issueStakingRewardsCall {}).await?;
    info!("Issued staking rewards.");
    Ok(())
}

/// Reward value accrued by `staker` on `token`, as a decimal amount
pub async fn staking_reward_value(
    client: &RpcProvider,
    farm: Address,
    staker: Address,
    token: Address,
) -> Result<f64, ScriptError> {
    let contract = ISavvyFinanceFarm::new(farm, client.clone());
    let value = contract
        .calculateStakerStakingRewardValue(staker, token)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    Ok(from_wei(value._0))
}

/// Send LINK to `to`, e.g. to pay for oracle requests
pub async fn fund_with_link(
    client: &RpcProvider,
    link_token: Address,
    to: Address,
    amount: &str,
) -> Result<(), ScriptError> {
    let amount_wei = to_wei(amount)?;
    send_call(
        client,
        link_token,
        &IERC20::transferCall {
            to,
            amount: amount_wei,
        },
    )
    .await?;
    info!("Funded {} with {} LINK.", to, amount);
    Ok(())
}

/// Allow `spender` to move `amount` of `token`
async fn approve(
    client: &RpcProvider,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<(), ScriptError> {
    send_call(client, token, &IERC20::approveCall { spender, amount }).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_are_upper_kebab_case() {
        assert_eq!(token_display_name("svf"), "SVF");
        assert_eq!(token_display_name("wbnb_busd"), "WBNB-BUSD");
    }

    #[test]
    fn lp_tokens_get_the_second_category() {
        assert_eq!(token_category("wbnb"), 0);
        assert_eq!(token_category("wbnb_busd"), 1);
    }
}
