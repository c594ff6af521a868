//! Implementations of the script commands

use std::path::PathBuf;

use alloy::primitives::{Address, Bytes};
use tracing::{info, warn};

use crate::{
    actions::{self, Tokens},
    cli::{
        AccountArgs, DeployContractsArgs, FundWithLinkArgs, PriceArgs,
        RewardTokenArgs, SetTokenCategoriesArgs, SetTokensPricesArgs, StakersArgs,
        StakingSetupArgs, TokenAmountArgs, TokenSelectionArgs, TokensStakersArgs, UpgradeArgs,
        UpgradeTarget,
    },
    config::parse_address,
    deploy::{
        mocks::deploy_contract_mocks,
        savvy::{
            deploy_savvy_finance, deploy_savvy_finance_farm, deploy_savvy_finance_staking,
            deploy_savvy_finance_upgradeable, get_contracts, latest_deployment, SavvyContracts,
            SAVVY_FINANCE, SAVVY_FINANCE_STAKING,
        },
    },
    errors::ScriptError,
    frontend::update_front_end,
    output_writer::{keyed, print_json},
    price::{is_lp_token_name, MarketPrices},
    proxy::{self, encode_function_data},
    registry::get_contract,
    reshape::{get_stakers_data, get_tokens_data, get_tokens_stakers_data},
    session::Session,
    staking,
    tx::{abi::ISavvyFinanceFarm, reader::token_balance},
    units::from_wei,
};

/// Logical name of the Savvy Finance token
pub const SVF: &str = "svf";

/// Tokens the farm is set up with when none are selected
pub const FARM_TOKEN_NAMES: [&str; 4] = [SVF, "wbnb", "busd", "wbnb_busd"];

/// Tokens registered on the legacy staking contract, by configured contract name
pub const STAKING_TOKEN_NAMES: [&str; 3] = ["wbnb_token", "busd_token", "link_token"];

/// Contract name a farm token is configured under: `<name>_lp_token` for pairs,
/// `<name>_token` otherwise
pub fn farm_token_contract_name(token_name: &str) -> String {
    if is_lp_token_name(token_name) {
        format!("{token_name}_lp_token")
    } else {
        format!("{token_name}_token")
    }
}

/// Resolve a farm token given by logical name or by address
pub async fn resolve_token(
    session: &mut Session,
    contracts: &SavvyContracts,
    token: &str,
) -> Result<Address, ScriptError> {
    if token.starts_with("0x") {
        return parse_address(token);
    }
    if token == SVF {
        return Ok(contracts.token);
    }
    get_contract(session, &farm_token_contract_name(token)).await
}

/// Resolve the selected tokens, every farm token when the selection is empty
pub async fn get_tokens(
    session: &mut Session,
    contracts: &SavvyContracts,
    selection: &[String],
) -> Result<Tokens, ScriptError> {
    let names: Vec<String> = if selection.is_empty() {
        FARM_TOKEN_NAMES.iter().map(|name| name.to_string()).collect()
    } else {
        selection.to_vec()
    };

    let mut tokens = Vec::with_capacity(names.len());
    for name in names {
        let address = resolve_token(session, contracts, &name).await?;
        tokens.push((name, address));
    }
    Ok(tokens)
}

/// `account` when given, the session account otherwise
fn account_or_default(session: &Session, account: Option<&str>) -> Result<Address, ScriptError> {
    account.map_or(Ok(session.account), parse_address)
}

/// Addresses of the list, `None` for an empty list
fn parse_addresses(raw: &[String]) -> Result<Option<Vec<Address>>, ScriptError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.iter()
        .map(|address| parse_address(address))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Addresses of the selected tokens, `None` for an empty selection
async fn selected_token_addresses(
    session: &mut Session,
    contracts: &SavvyContracts,
    selection: &[String],
) -> Result<Option<Vec<Address>>, ScriptError> {
    if selection.is_empty() {
        return Ok(None);
    }
    let tokens = get_tokens(session, contracts, selection).await?;
    Ok(Some(tokens.into_iter().map(|(_, address)| address).collect()))
}

/// Deploy the mock bundle on a local or test network
pub async fn deploy_mocks(session: &mut Session) -> Result<(), ScriptError> {
    if !session.network.accepts_mocks() {
        return Err(ScriptError::Config(format!(
            "mocks are not deployed on {}",
            session.network.name
        )));
    }
    deploy_contract_mocks(session).await
}

/// Deploy the farm contracts and print their addresses
pub async fn deploy_contracts(
    args: DeployContractsArgs,
    session: &mut Session,
) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, Some(args.target)).await?;
    print_json(&keyed([
        ("proxyAdmin", contracts.proxy_admin.to_checksum(None)),
        ("token", contracts.token.to_checksum(None)),
        ("farm", contracts.farm.to_checksum(None)),
    ])?)
}

/// Everything the farm knows, then the token balances of the farm and of the account
pub async fn status(session: &mut Session) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    print_tokens_data(session, &contracts, None).await?;
    print_stakers_data(session, &contracts, None).await?;
    print_tokens_stakers_data(session, &contracts, None, None).await?;
    print_balances(session, &contracts).await
}

/// Print the farm data of the selected tokens
pub async fn tokens_data(args: TokenSelectionArgs, session: &mut Session) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let tokens = selected_token_addresses(session, &contracts, &args.tokens).await?;
    print_tokens_data(session, &contracts, tokens).await
}

/// Print the farm data of the selected stakers
pub async fn stakers_data(args: StakersArgs, session: &mut Session) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    print_stakers_data(session, &contracts, parse_addresses(&args.stakers)?).await
}

/// Print every selected staker position on every selected token
pub async fn tokens_stakers_data(
    args: TokensStakersArgs,
    session: &mut Session,
) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let tokens = selected_token_addresses(session, &contracts, &args.tokens).await?;
    let stakers = parse_addresses(&args.stakers)?;
    print_tokens_stakers_data(session, &contracts, tokens, stakers).await
}

/// Print the token balances of the farm and of the account
pub async fn balances(session: &mut Session) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    print_balances(session, &contracts).await
}

/// Token records keyed by address
async fn print_tokens_data(
    session: &Session,
    contracts: &SavvyContracts,
    tokens: Option<Vec<Address>>,
) -> Result<(), ScriptError> {
    let tokens_data = get_tokens_data(contracts.farm, tokens, &session.client).await?;
    print_json(&keyed(
        tokens_data.into_iter().map(|record| (record.address.clone(), record)),
    )?)
}

/// Staker records keyed by address
async fn print_stakers_data(
    session: &Session,
    contracts: &SavvyContracts,
    stakers: Option<Vec<Address>>,
) -> Result<(), ScriptError> {
    let stakers_data = get_stakers_data(contracts.farm, stakers, &session.client).await?;
    print_json(&keyed(
        stakers_data.into_iter().map(|record| (record.address.clone(), record)),
    )?)
}

/// Staker positions keyed by token then by staker
async fn print_tokens_stakers_data(
    session: &Session,
    contracts: &SavvyContracts,
    tokens: Option<Vec<Address>>,
    stakers: Option<Vec<Address>>,
) -> Result<(), ScriptError> {
    let tokens_stakers_data =
        get_tokens_stakers_data(contracts.farm, tokens, stakers, &session.client).await?;

    let mut by_token = Vec::with_capacity(tokens_stakers_data.len());
    for (token, token_stakers) in tokens_stakers_data {
        let by_staker = keyed(
            token_stakers
                .into_iter()
                .map(|record| (record.address.clone(), record)),
        )?;
        by_token.push((token.to_checksum(None), by_staker));
    }
    print_json(&keyed(by_token)?)
}

/// Savvy Finance token balances of the farm then of the account
async fn print_balances(session: &Session, contracts: &SavvyContracts) -> Result<(), ScriptError> {
    let farm_balance = token_balance(contracts.token, contracts.farm, &session.client).await?;
    let account_balance = token_balance(contracts.token, session.account, &session.client).await?;
    println!("{}", from_wei(farm_balance));
    println!("{}", from_wei(account_balance));
    Ok(())
}

/// Register the selected tokens
pub async fn add_tokens(args: TokenSelectionArgs, session: &mut Session) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let tokens = get_tokens(session, &contracts, &args.tokens).await?;
    let zero = session.config.get_address("zero")?;
    actions::add_tokens(&session.client, contracts.farm, &tokens, zero).await
}

/// Activate the selected tokens
pub async fn activate_tokens(
    args: TokenSelectionArgs,
    session: &mut Session,
) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let tokens = get_tokens(session, &contracts, &args.tokens).await?;
    actions::activate_tokens(&session.client, contracts.farm, &tokens).await
}

/// Deactivate the selected tokens
pub async fn deactivate_tokens(
    args: TokenSelectionArgs,
    session: &mut Session,
) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let tokens = get_tokens(session, &contracts, &args.tokens).await?;
    actions::deactivate_tokens(&session.client, contracts.farm, &tokens).await
}

/// Enable multi reward on the selected tokens
pub async fn enable_multi_reward(
    args: TokenSelectionArgs,
    session: &mut Session,
) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let tokens = get_tokens(session, &contracts, &args.tokens).await?;
    actions::enable_tokens_multi_reward(&session.client, contracts.farm, &tokens).await
}

/// Disable multi reward on the selected tokens
pub async fn disable_multi_reward(
    args: TokenSelectionArgs,
    session: &mut Session,
) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let tokens = get_tokens(session, &contracts, &args.tokens).await?;
    actions::disable_tokens_multi_reward(&session.client, contracts.farm, &tokens).await
}

/// Name the token categories
pub async fn set_token_categories(
    args: SetTokenCategoriesArgs,
    session: &mut Session,
) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    actions::set_token_categories(&session.client, contracts.farm, &args.categories).await
}

/// Push market prices of the selected tokens
pub async fn set_tokens_prices(
    args: SetTokensPricesArgs,
    session: &mut Session,
) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let tokens = get_tokens(session, &contracts, &args.selection.tokens).await?;
    let prices = MarketPrices::new(&session.config)?;
    if args.lp {
        actions::set_lp_tokens_prices(&session.client, contracts.farm, &tokens, &prices).await
    } else {
        actions::set_tokens_prices(&session.client, contracts.farm, &tokens, &prices).await
    }
}

/// Set the reward token of a token
pub async fn set_token_reward_token(
    args: RewardTokenArgs,
    session: &mut Session,
) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let token = resolve_token(session, &contracts, &args.token).await?;
    let reward_token = resolve_token(session, &contracts, &args.reward_token).await?;
    actions::set_token_reward_token(&session.client, contracts.farm, token, reward_token).await
}

/// Deposit reward liquidity
pub async fn deposit(args: TokenAmountArgs, session: &mut Session) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let token = resolve_token(session, &contracts, &args.token).await?;
    actions::deposit_token(&session.client, contracts.farm, token, &args.amount).await
}

/// Withdraw reward liquidity
pub async fn withdraw(args: TokenAmountArgs, session: &mut Session) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let token = resolve_token(session, &contracts, &args.token).await?;
    actions::withdraw_token(&session.client, contracts.farm, token, &args.amount).await
}

/// Set the reward token of the account's stake
pub async fn set_staking_reward_token(
    args: RewardTokenArgs,
    session: &mut Session,
) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let token = resolve_token(session, &contracts, &args.token).await?;
    let reward_token = resolve_token(session, &contracts, &args.reward_token).await?;
    actions::set_staking_reward_token(&session.client, contracts.farm, token, reward_token).await
}

/// Stake, then log the staking reward value
pub async fn stake(args: TokenAmountArgs, session: &mut Session) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let token = resolve_token(session, &contracts, &args.token).await?;
    actions::stake_token(&session.client, contracts.farm, token, &args.amount).await?;

    let reward_value =
        actions::staking_reward_value(&session.client, contracts.farm, session.account, token)
            .await;
    report_staking_reward_value(reward_value);
    Ok(())
}

/// Log the reward value read after a stake. The stake is already confirmed, so a
/// failed read is only reported.
fn report_staking_reward_value(reward_value: Result<f64, ScriptError>) -> Option<f64> {
    match reward_value {
        Ok(value) => {
            info!("Staking reward value is now {}", value);
            Some(value)
        }
        Err(e) => {
            warn!("Could not read the staking reward value: {}", e);
            None
        }
    }
}

/// Unstake
pub async fn unstake(args: TokenAmountArgs, session: &mut Session) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let token = resolve_token(session, &contracts, &args.token).await?;
    actions::unstake_token(&session.client, contracts.farm, token, &args.amount).await
}

/// Withdraw accrued rewards
pub async fn withdraw_staking_reward(
    args: TokenAmountArgs,
    session: &mut Session,
) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let reward_token = resolve_token(session, &contracts, &args.token).await?;
    actions::withdraw_staking_reward(&session.client, contracts.farm, reward_token, &args.amount)
        .await
}

/// Pay out the pending staking rewards
pub async fn issue_staking_rewards(session: &mut Session) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    actions::issue_staking_rewards(&session.client, contracts.farm).await
}

/// Stop charging fees to an account
pub async fn exclude_from_fees(args: AccountArgs, session: &mut Session) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let account = account_or_default(session, args.account.as_deref())?;
    actions::exclude_from_fees(&session.client, contracts.farm, account).await
}

/// Charge fees to an account again
pub async fn include_in_fees(args: AccountArgs, session: &mut Session) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let account = account_or_default(session, args.account.as_deref())?;
    actions::include_in_fees(&session.client, contracts.farm, account).await
}

/// Print the market price of a token configured on the price network
pub async fn token_price(args: PriceArgs, session: &Session) -> Result<(), ScriptError> {
    let prices = MarketPrices::new(&session.config)?;
    println!("{}", prices.configured_token_price(&args.contract_name).await?);
    Ok(())
}

/// Print the market price of an LP token
pub async fn lp_token_price(args: PriceArgs, session: &Session) -> Result<(), ScriptError> {
    let prices = MarketPrices::new(&session.config)?;
    println!("{}", prices.configured_lp_token_price(&args.contract_name).await?);
    Ok(())
}

/// Send LINK to `to`, the farm by default
pub async fn fund_with_link(args: FundWithLinkArgs, session: &mut Session) -> Result<(), ScriptError> {
    let link_token = get_contract(session, "link_token").await?;
    let to = match args.to.as_deref() {
        Some(to) => parse_address(to)?,
        None => get_contracts(session, None).await?.farm,
    };
    actions::fund_with_link(&session.client, link_token, to, &args.amount).await
}

/// Payload run along with an upgrade. Only the farm can be initialized again,
/// the token initializer mints the initial supply.
fn upgrade_initializer(target: UpgradeTarget, initialize: bool) -> Result<Option<Bytes>, ScriptError> {
    match (target, initialize) {
        (_, false) => Ok(None),
        (UpgradeTarget::Farm, true) => Ok(Some(encode_function_data(Some(
            &ISavvyFinanceFarm::initializeCall {},
        )))),
        (UpgradeTarget::Token, true) => Err(ScriptError::Config(
            "the token proxy cannot be initialized again".to_string(),
        )),
    }
}

/// Deploy a new implementation and point the proxy at it
pub async fn upgrade(args: UpgradeArgs, session: &mut Session) -> Result<(), ScriptError> {
    let initializer_data = upgrade_initializer(args.target, args.initialize)?;
    let contracts = get_contracts(session, None).await?;

    let (proxy, new_implementation) = match args.target {
        UpgradeTarget::Farm => (contracts.farm, deploy_savvy_finance_farm(session).await?),
        UpgradeTarget::Token => (
            contracts.token,
            deploy_savvy_finance_upgradeable(session).await?,
        ),
    };

    let proxy_admin = (!args.without_admin).then_some(contracts.proxy_admin);
    proxy::upgrade(
        &session.client,
        proxy,
        new_implementation,
        proxy_admin,
        initializer_data,
    )
    .await?;
    Ok(())
}

/// Copy the build and token list into the front end
pub async fn front_end(args: TokenSelectionArgs, session: &mut Session) -> Result<(), ScriptError> {
    let contracts = get_contracts(session, None).await?;
    let tokens = get_tokens(session, &contracts, &args.tokens).await?;
    update_front_end(
        &session.build_dir(),
        &PathBuf::from(&session.config.project.front_end_dir),
        &session.config,
        &tokens,
    )
}

/// Register the configured tokens plus the Savvy Finance token on the legacy
/// staking contract, then push their prices
pub async fn staking_setup(args: StakingSetupArgs, session: &mut Session) -> Result<(), ScriptError> {
    let (savvy_finance, savvy_finance_staking) = if args.deploy {
        (
            deploy_savvy_finance(session).await?,
            deploy_savvy_finance_staking(session).await?,
        )
    } else {
        (
            latest_deployment(session, SAVVY_FINANCE)?,
            latest_deployment(session, SAVVY_FINANCE_STAKING)?,
        )
    };

    let mut tokens: Tokens = Vec::with_capacity(STAKING_TOKEN_NAMES.len() + 1);
    for name in STAKING_TOKEN_NAMES {
        tokens.push((name.to_string(), get_contract(session, name).await?));
    }
    tokens.push(("svf_token".to_string(), savvy_finance));

    let zero = session.config.get_address("zero")?;
    staking::add_tokens(&session.client, savvy_finance_staking, &tokens, zero).await?;
    staking::activate_tokens(&session.client, savvy_finance_staking, &tokens).await?;

    if !args.price_tokens.is_empty() {
        let priced: Tokens = tokens
            .iter()
            .filter(|(name, _)| args.price_tokens.contains(name))
            .cloned()
            .collect();
        let prices = MarketPrices::new(&session.config)?;
        staking::set_token_price(&session.client, savvy_finance_staking, &priced, &prices).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farm_tokens_map_to_configured_contracts() {
        assert_eq!(farm_token_contract_name("wbnb"), "wbnb_token");
        assert_eq!(farm_token_contract_name("busd"), "busd_token");
        assert_eq!(farm_token_contract_name("wbnb_busd"), "wbnb_busd_lp_token");
    }

    #[test]
    fn empty_address_list_selects_everything() {
        assert!(parse_addresses(&[]).unwrap().is_none());
        let parsed = parse_addresses(&["0x0000000000000000000000000000000000000001".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(parsed, vec![Address::with_last_byte(1)]);
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        assert!(parse_addresses(&["0x12".to_string()]).is_err());
    }

    #[test]
    fn failed_reward_read_does_not_fail_the_stake() {
        let failed = Err(ScriptError::ContractInteraction("execution reverted".to_string()));
        assert_eq!(report_staking_reward_value(failed), None);
        assert_eq!(report_staking_reward_value(Ok(2.5)), Some(2.5));
    }

    #[test]
    fn only_the_farm_is_initialized_on_upgrade() {
        assert!(upgrade_initializer(UpgradeTarget::Farm, false).unwrap().is_none());
        assert!(upgrade_initializer(UpgradeTarget::Token, false).unwrap().is_none());

        let farm = upgrade_initializer(UpgradeTarget::Farm, true).unwrap().unwrap();
        assert_eq!(
            farm.as_ref(),
            <ISavvyFinanceFarm::initializeCall as alloy::sol_types::SolCall>::SELECTOR.as_slice()
        );

        assert!(matches!(
            upgrade_initializer(UpgradeTarget::Token, true),
            Err(ScriptError::Config(_))
        ));
    }
}
