//! Labeled, decimal converted views of the farm query results.
//!
//! Fields are taken positionally from the contract structs; fixed point
//! amounts are converted from 18 decimals, counters and timestamps are kept as integers.

use alloy::primitives::{Address, U256};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::{
    errors::ScriptError,
    tx::{
        abi::ISavvyFinanceFarm::{
            self, StakerData, StakingRewardData, TokenData, TokenStakerData,
        },
        client::RpcProvider,
    },
    units::from_wei,
};

/// A farm token
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    /// Token address
    pub address: String,
    /// Accepts stakes
    pub is_active: bool,
    /// Stakers may pick their reward token
    pub has_multi_reward: bool,
    /// Registered name
    pub name: String,
    /// Category number
    pub category: u64,
    /// Price pushed to the farm
    pub price: f64,
    /// Reward liquidity
    pub reward_balance: f64,
    /// Total staked
    pub staking_balance: f64,
    /// Stake fee, in percent
    pub stake_fee: f64,
    /// Unstake fee, in percent
    pub unstake_fee: f64,
    /// Staking APR, in percent
    pub staking_apr: f64,
    /// Default reward token
    pub reward_token: String,
    /// Token admin
    pub admin: String,
    /// Registration time
    pub timestamp_added: u64,
    /// Last update time
    pub timestamp_last_updated: u64,
}

/// A farm staker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakerRecord {
    /// Staker address
    pub address: String,
    /// Has a stake
    pub is_active: bool,
    /// Number of tokens staked
    pub unique_tokens_staked: u64,
    /// First stake time
    pub timestamp_added: u64,
    /// Last update time
    pub timestamp_last_updated: u64,
}

/// A staking reward paid out
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingRewardRecord {
    /// Position in the contract list
    pub id: u64,
    /// Rewarded staker
    pub staker: String,
    /// Staked token
    pub staked_token: String,
    /// Staked token price at reward time
    pub staked_token_price: f64,
    /// Staked amount
    pub staked_token_amount: f64,
    /// Token the reward is paid in
    pub reward_token: String,
    /// Reward token price at reward time
    pub reward_token_price: f64,
    /// Reward amount
    pub reward_token_amount: f64,
    /// Stored by the farm as a fixed point value, converted like the amounts
    pub staking_duration_in_seconds: f64,
    /// What triggered the reward
    pub action_performed: Vec<String>,
    /// Creation time
    pub timestamp_added: u64,
    /// Last update time
    pub timestamp_last_updated: u64,
}

/// A staker position on one token
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStakerRecord {
    /// Staker address
    pub address: String,
    /// Reward liquidity of the staker
    pub reward_balance: f64,
    /// Staked amount
    pub staking_balance: f64,
    /// Token the rewards are paid in
    pub staking_reward_token: String,
    /// Rewards keyed by their position in the contract list
    pub staking_rewards: BTreeMap<usize, StakingRewardRecord>,
    /// Last reward time
    pub timestamp_last_rewarded: u64,
    /// First stake time
    pub timestamp_added: u64,
    /// Last update time
    pub timestamp_last_updated: u64,
}

/// Checksummed address
fn label(address: Address) -> String {
    address.to_checksum(None)
}

/// Timestamps and counts, saturated to `u64`
fn integer(value: U256) -> u64 {
    value.saturating_to::<u64>()
}

impl TokenRecord {
    /// Record of `token`
    pub fn new(token: Address, data: TokenData) -> Self {
        Self {
            address: label(token),
            is_active: data.isActive,
            has_multi_reward: data.hasMultiReward,
            name: data.name,
            category: integer(data.category),
            price: from_wei(data.price),
            reward_balance: from_wei(data.rewardBalance),
            staking_balance: from_wei(data.stakingBalance),
            stake_fee: from_wei(data.stakeFee),
            unstake_fee: from_wei(data.unstakeFee),
            staking_apr: from_wei(data.stakingApr),
            reward_token: label(data.rewardToken),
            admin: label(data.admin),
            timestamp_added: integer(data.timestampAdded),
            timestamp_last_updated: integer(data.timestampLastUpdated),
        }
    }
}

impl StakerRecord {
    /// Record of `staker`
    pub fn new(staker: Address, data: StakerData) -> Self {
        Self {
            address: label(staker),
            is_active: data.isActive,
            unique_tokens_staked: integer(data.uniqueTokensStaked),
            timestamp_added: integer(data.timestampAdded),
            timestamp_last_updated: integer(data.timestampLastUpdated),
        }
    }
}

impl StakingRewardRecord {
    /// Record of a contract reward
    pub fn new(data: StakingRewardData) -> Self {
        Self {
            id: integer(data.id),
            staker: label(data.staker),
            staked_token: label(data.stakedToken),
            staked_token_price: from_wei(data.stakedTokenPrice),
            staked_token_amount: from_wei(data.stakedTokenAmount),
            reward_token: label(data.rewardToken),
            reward_token_price: from_wei(data.rewardTokenPrice),
            reward_token_amount: from_wei(data.rewardTokenAmount),
            staking_duration_in_seconds: from_wei(data.stakingDurationInSeconds),
            action_performed: data.actionPerformed.to_vec(),
            timestamp_added: integer(data.timestampAdded),
            timestamp_last_updated: integer(data.timestampLastUpdated),
        }
    }
}

impl TokenStakerRecord {
    /// Position of `staker`
    pub fn new(staker: Address, data: TokenStakerData) -> Self {
        Self {
            address: label(staker),
            reward_balance: from_wei(data.rewardBalance),
            staking_balance: from_wei(data.stakingBalance),
            staking_reward_token: label(data.stakingRewardToken),
            staking_rewards: data
                .stakingRewards
                .into_iter()
                .map(StakingRewardRecord::new)
                .enumerate()
                .collect(),
            timestamp_last_rewarded: integer(data.timestampLastRewarded),
            timestamp_added: integer(data.timestampAdded),
            timestamp_last_updated: integer(data.timestampLastUpdated),
        }
    }
}

/// Tokens registered on the farm
pub async fn get_tokens(farm: Address, client: &RpcProvider) -> Result<Vec<Address>, ScriptError> {
    let contract = ISavvyFinanceFarm::new(farm, client.clone());
    let tokens = contract
        .getTokens()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    Ok(tokens._0)
}

/// Stakers known to the farm
pub async fn get_stakers(farm: Address, client: &RpcProvider) -> Result<Vec<Address>, ScriptError> {
    let contract = ISavvyFinanceFarm::new(farm, client.clone());
    let stakers = contract
        .getStakers()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    Ok(stakers._0)
}

/// Token data of `tokens`, or of every farm token when `None`
pub async fn get_tokens_data(
    farm: Address,
    tokens: Option<Vec<Address>>,
    client: &RpcProvider,
) -> Result<Vec<TokenRecord>, ScriptError> {
    let tokens = match tokens {
        Some(tokens) => tokens,
        None => get_tokens(farm, client).await?,
    };
    let contract = ISavvyFinanceFarm::new(farm, client.clone());

    let mut tokens_data = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token_data = contract
            .getTokenData(token)
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        tokens_data.push(TokenRecord::new(token, token_data._0));
    }
    Ok(tokens_data)
}

/// Staker data of `stakers`, or of every farm staker when `None`
pub async fn get_stakers_data(
    farm: Address,
    stakers: Option<Vec<Address>>,
    client: &RpcProvider,
) -> Result<Vec<StakerRecord>, ScriptError> {
    let stakers = match stakers {
        Some(stakers) => stakers,
        None => get_stakers(farm, client).await?,
    };
    let contract = ISavvyFinanceFarm::new(farm, client.clone());

    let mut stakers_data = Vec::with_capacity(stakers.len());
    for staker in stakers {
        let staker_data = contract
            .getStakerData(staker)
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        stakers_data.push(StakerRecord::new(staker, staker_data._0));
    }
    Ok(stakers_data)
}

/// Per token, the position of every staker
pub async fn get_tokens_stakers_data(
    farm: Address,
    tokens: Option<Vec<Address>>,
    stakers: Option<Vec<Address>>,
    client: &RpcProvider,
) -> Result<Vec<(Address, Vec<TokenStakerRecord>)>, ScriptError> {
    let tokens = match tokens {
        Some(tokens) => tokens,
        None => get_tokens(farm, client).await?,
    };
    let stakers = match stakers {
        Some(stakers) => stakers,
        None => get_stakers(farm, client).await?,
    };
    let contract = ISavvyFinanceFarm::new(farm, client.clone());

    let mut tokens_stakers_data = Vec::with_capacity(tokens.len());
    for token in tokens {
        let mut token_stakers_data = Vec::with_capacity(stakers.len());
        for staker in &stakers {
            let token_staker_data = contract
                .getTokenStakerData(token, *staker)
                .call()
                .await
                .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
            token_stakers_data.push(TokenStakerRecord::new(*staker, token_staker_data._0));
        }
        tokens_stakers_data.push((token, token_stakers_data));
    }
    Ok(tokens_stakers_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(whole: u64) -> U256 {
        U256::from(whole) * U256::from(10u64).pow(U256::from(18u64))
    }

    fn token_data() -> TokenData {
        TokenData {
            isActive: true,
            hasMultiReward: false,
            name: "WBNB-BUSD".to_string(),
            category: U256::from(1u64),
            price: ether(250),
            rewardBalance: ether(10),
            stakingBalance: ether(1_500),
            stakeFee: ether(1) / U256::from(100u64),
            unstakeFee: U256::ZERO,
            stakingApr: ether(12),
            rewardToken: Address::ZERO,
            admin: Address::repeat_byte(0xaa),
            timestampAdded: U256::from(1_650_000_000u64),
            timestampLastUpdated: U256::from(1_650_000_100u64),
        }
    }

    #[test]
    fn token_fields_are_labeled_and_converted() {
        let token = Address::repeat_byte(0x11);
        let record = TokenRecord::new(token, token_data());
        assert_eq!(record.address, token.to_checksum(None));
        assert_eq!(record.category, 1);
        assert_eq!(record.price, 250.0);
        assert_eq!(record.staking_balance, 1_500.0);
        assert_eq!(record.stake_fee, 0.01);
        assert_eq!(record.unstake_fee, 0.0);
        assert_eq!(record.staking_apr, 12.0);
        assert_eq!(record.timestamp_added, 1_650_000_000);
    }

    #[test]
    fn token_record_serialises_with_contract_labels() {
        let record = TokenRecord::new(Address::repeat_byte(0x11), token_data());
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "address",
                "isActive",
                "hasMultiReward",
                "name",
                "category",
                "price",
                "rewardBalance",
                "stakingBalance",
                "stakeFee",
                "unstakeFee",
                "stakingApr",
                "rewardToken",
                "admin",
                "timestampAdded",
                "timestampLastUpdated",
            ]
        );
    }

    #[test]
    fn staker_counters_stay_integers() {
        let record = StakerRecord::new(
            Address::repeat_byte(0x22),
            StakerData {
                isActive: true,
                uniqueTokensStaked: U256::from(2u64),
                timestampAdded: U256::from(10u64),
                timestampLastUpdated: U256::from(20u64),
            },
        );
        assert_eq!(record.unique_tokens_staked, 2);
        assert_eq!(record.timestamp_last_updated, 20);
    }

    #[test]
    fn staking_rewards_are_keyed_by_position() {
        let reward = |id: u64| StakingRewardData {
            id: U256::from(id),
            staker: Address::repeat_byte(0x22),
            stakedToken: Address::repeat_byte(0x11),
            stakedTokenPrice: ether(2),
            stakedTokenAmount: ether(1_000),
            rewardToken: Address::repeat_byte(0x33),
            rewardTokenPrice: ether(1),
            rewardTokenAmount: ether(5),
            stakingDurationInSeconds: ether(3_600),
            actionPerformed: ["stake".to_string(), "issueStakingReward".to_string()],
            timestampAdded: U256::from(1u64),
            timestampLastUpdated: U256::from(2u64),
        };
        let record = TokenStakerRecord::new(
            Address::repeat_byte(0x22),
            TokenStakerData {
                rewardBalance: ether(5),
                stakingBalance: ether(1_000),
                stakingRewardToken: Address::repeat_byte(0x33),
                stakingRewards: vec![reward(7), reward(8)],
                timestampLastRewarded: U256::from(3u64),
                timestampAdded: U256::from(1u64),
                timestampLastUpdated: U256::from(2u64),
            },
        );

        assert_eq!(record.staking_balance, 1_000.0);
        assert_eq!(record.staking_rewards.len(), 2);
        assert_eq!(record.staking_rewards[&0].id, 7);
        assert_eq!(record.staking_rewards[&1].id, 8);
        assert_eq!(record.staking_rewards[&1].staking_duration_in_seconds, 3_600.0);
        assert_eq!(
            record.staking_rewards[&0].action_performed,
            vec!["stake".to_string(), "issueStakingReward".to_string()]
        );

        let value = serde_json::to_value(&record).unwrap();
        assert!(value["stakingRewards"]["1"]["rewardTokenAmount"].is_number());
    }

    #[test]
    fn oversized_integers_saturate() {
        assert_eq!(integer(U256::MAX), u64::MAX);
    }
}
