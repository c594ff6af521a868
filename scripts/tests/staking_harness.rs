//! Staking contract behaviour against a local node.
//!
//! Run with `cargo test -- --ignored` once a node is listening on `SAVVY_TEST_RPC`
//! (default `http://127.0.0.1:8545`) and the compiled artifacts are in
//! `SAVVY_TEST_BUILD_DIR` (default `./build`).
//!
//! Every test signs with the same node account, so they run one at a time, each
//! with its own deployment history.

use std::{env, path::PathBuf};

use alloy::primitives::{Address, U256};
use savvy_scripts::{
    actions::Tokens,
    config::Config,
    constants::DEFAULT_LOCAL_RPC,
    deploy::savvy::{deploy_savvy_finance, deploy_savvy_finance_staking},
    frontend::copy_folder,
    session::{Session, SessionOptions},
    staking,
    tx::{
        abi::{ISavvyFinanceStaking, IERC20},
        reader::token_balance,
        sender::send_call,
    },
    units::to_wei,
};
use tokio::sync::{Mutex, MutexGuard};

const STAKE_AMOUNT: &str = "10000";

/// Serializes the tests: one signer, one nonce sequence
static NODE: Mutex<()> = Mutex::const_new(());

/// A session on the local node, holding the node until dropped. Artifacts are
/// copied to a scratch build dir so the history starts empty.
async fn local_session(test_name: &str) -> (MutexGuard<'static, ()>, Session) {
    let guard = NODE.lock().await;

    let rpc_url = env::var("SAVVY_TEST_RPC").unwrap_or_else(|_| DEFAULT_LOCAL_RPC.to_string());
    let artifacts = PathBuf::from(
        env::var("SAVVY_TEST_BUILD_DIR").unwrap_or_else(|_| "./build".to_string()),
    )
    .join("contracts");
    let scratch = env::temp_dir().join(format!(
        "savvy-staking-harness-{}-{}",
        test_name,
        std::process::id()
    ));
    copy_folder(&artifacts, &scratch.join("contracts")).unwrap();
    let build_dir = scratch.display().to_string().replace('\\', "/");

    let config = Config::parse(&format!(
        r#"
[project]
default_network = "development"
build_dir = "{build_dir}"

[addresses]
zero = "0x0000000000000000000000000000000000000000"

[networks.development]
rpc_url = "{rpc_url}"
"#
    ))
    .unwrap();

    let session = Session::connect(config, SessionOptions::default()).await.unwrap();
    (guard, session)
}

/// A fresh staking contract with `token_count` fresh tokens registered in order
async fn staking_with_tokens(session: &mut Session, token_count: usize) -> (Address, Tokens) {
    let staking_contract = deploy_savvy_finance_staking(session).await.unwrap();

    let mut tokens: Tokens = Vec::with_capacity(token_count);
    for index in 0..token_count {
        let token = deploy_savvy_finance(session).await.unwrap();
        tokens.push((format!("token_{index}"), token));
    }

    staking::add_tokens(&session.client, staking_contract, &tokens, Address::ZERO)
        .await
        .unwrap();
    (staking_contract, tokens)
}

async fn stake(session: &Session, staking_contract: Address, token: Address, amount: U256) {
    send_call(
        &session.client,
        token,
        &IERC20::approveCall {
            spender: staking_contract,
            amount,
        },
    )
    .await
    .unwrap();
    send_call(
        &session.client,
        staking_contract,
        &ISavvyFinanceStaking::stakeTokenCall {
            token,
            amount,
            rewardToken: Address::ZERO,
        },
    )
    .await
    .unwrap();
}

async fn unstake(session: &Session, staking_contract: Address, token: Address, amount: U256) {
    send_call(
        &session.client,
        staking_contract,
        &ISavvyFinanceStaking::unstakeTokenCall {
            token,
            amount,
            rewardToken: Address::ZERO,
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
#[ignore]
async fn tokens_keep_their_registration_order() {
    let (_node, mut session) = local_session("tokens_keep_their_registration_order").await;
    let (staking_contract, tokens) = staking_with_tokens(&mut session, 3).await;
    let contract = ISavvyFinanceStaking::new(staking_contract, session.client.clone());

    for (index, (_, token)) in tokens.iter().enumerate() {
        let registered = contract.tokens(U256::from(index)).call().await.unwrap()._0;
        assert_eq!(registered, *token);
    }
}

#[tokio::test]
#[ignore]
async fn removal_moves_the_last_token_into_the_gap() {
    let (_node, mut session) = local_session("removal_moves_the_last_token_into_the_gap").await;
    let (staking_contract, tokens) = staking_with_tokens(&mut session, 3).await;
    let contract = ISavvyFinanceStaking::new(staking_contract, session.client.clone());

    send_call(
        &session.client,
        staking_contract,
        &ISavvyFinanceStaking::removeTokenCall { token: tokens[0].1 },
    )
    .await
    .unwrap();

    assert_eq!(contract.tokens(U256::from(0)).call().await.unwrap()._0, tokens[2].1);
    assert_eq!(contract.tokens(U256::from(1)).call().await.unwrap()._0, tokens[1].1);
    assert!(contract.tokens(U256::from(2)).call().await.is_err());

    assert!(!contract.tokenIsActive(tokens[0].1).call().await.unwrap()._0);
}

#[tokio::test]
#[ignore]
async fn stakes_accumulate_and_count_unique_tokens_once() {
    let (_node, mut session) = local_session("stakes_accumulate_and_count_unique_tokens_once").await;
    let (staking_contract, tokens) = staking_with_tokens(&mut session, 2).await;
    staking::activate_tokens(&session.client, staking_contract, &tokens)
        .await
        .unwrap();
    let contract = ISavvyFinanceStaking::new(staking_contract, session.client.clone());
    let amount = to_wei(STAKE_AMOUNT).unwrap();
    let (first, second) = (tokens[0].1, tokens[1].1);

    stake(&session, staking_contract, first, amount).await;
    assert_eq!(
        token_balance(first, staking_contract, &session.client).await.unwrap(),
        amount
    );
    assert_eq!(contract.stakers(U256::ZERO).call().await.unwrap()._0, session.account);
    assert_eq!(
        contract.stakersUniqueTokensStaked(session.account).call().await.unwrap()._0,
        U256::from(1)
    );

    stake(&session, staking_contract, first, amount).await;
    assert_eq!(
        contract
            .tokensStakersBalances(first, session.account)
            .call()
            .await
            .unwrap()
            ._0,
        amount * U256::from(2)
    );
    assert_eq!(
        contract.stakersUniqueTokensStaked(session.account).call().await.unwrap()._0,
        U256::from(1)
    );

    stake(&session, staking_contract, second, amount).await;
    assert_eq!(
        contract.stakersUniqueTokensStaked(session.account).call().await.unwrap()._0,
        U256::from(2)
    );
}

#[tokio::test]
#[ignore]
async fn full_unstake_drops_the_staker() {
    let (_node, mut session) = local_session("full_unstake_drops_the_staker").await;
    let (staking_contract, tokens) = staking_with_tokens(&mut session, 1).await;
    staking::activate_tokens(&session.client, staking_contract, &tokens)
        .await
        .unwrap();
    let contract = ISavvyFinanceStaking::new(staking_contract, session.client.clone());
    let amount = to_wei(STAKE_AMOUNT).unwrap();
    let half = amount / U256::from(2);
    let token = tokens[0].1;

    stake(&session, staking_contract, token, amount).await;

    unstake(&session, staking_contract, token, half).await;
    assert_eq!(
        contract
            .tokensStakersBalances(token, session.account)
            .call()
            .await
            .unwrap()
            ._0,
        half
    );
    assert_eq!(contract.stakers(U256::ZERO).call().await.unwrap()._0, session.account);
    assert_eq!(
        contract.stakersUniqueTokensStaked(session.account).call().await.unwrap()._0,
        U256::from(1)
    );

    unstake(&session, staking_contract, token, half).await;
    assert_eq!(
        token_balance(token, staking_contract, &session.client).await.unwrap(),
        U256::ZERO
    );
    assert_eq!(
        contract.stakersUniqueTokensStaked(session.account).call().await.unwrap()._0,
        U256::ZERO
    );
    assert!(contract.stakers(U256::ZERO).call().await.is_err());
}

#[tokio::test]
#[ignore]
async fn full_unstake_of_one_token_keeps_the_staker() {
    let (_node, mut session) = local_session("full_unstake_of_one_token_keeps_the_staker").await;
    let (staking_contract, tokens) = staking_with_tokens(&mut session, 2).await;
    staking::activate_tokens(&session.client, staking_contract, &tokens)
        .await
        .unwrap();
    let contract = ISavvyFinanceStaking::new(staking_contract, session.client.clone());
    let amount = to_wei(STAKE_AMOUNT).unwrap();
    let (first, second) = (tokens[0].1, tokens[1].1);

    stake(&session, staking_contract, first, amount).await;
    stake(&session, staking_contract, second, amount).await;
    assert_eq!(
        contract.stakersUniqueTokensStaked(session.account).call().await.unwrap()._0,
        U256::from(2)
    );

    unstake(&session, staking_contract, first, amount).await;
    assert_eq!(
        contract
            .tokensStakersBalances(first, session.account)
            .call()
            .await
            .unwrap()
            ._0,
        U256::ZERO
    );
    assert_eq!(
        contract.stakersUniqueTokensStaked(session.account).call().await.unwrap()._0,
        U256::from(1)
    );
    assert_eq!(contract.stakers(U256::ZERO).call().await.unwrap()._0, session.account);
}
