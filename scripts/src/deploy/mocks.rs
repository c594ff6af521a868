use alloy::{
    primitives::{Address, I256},
    sol_types::SolConstructor,
};
use tracing::info;

use crate::{
    constants::TOKEN_DECIMALS,
    deploy::deploy::deploy_contract,
    errors::ScriptError,
    session::Session,
    tx::abi::{MockOracle, MockV3Aggregator, VRFCoordinatorV2Mock},
    units::to_wei,
};

/// Base fee of the VRF coordinator mock, 0.1 LINK
const VRF_BASE_FEE: u128 = 100_000_000_000_000_000;

/// Gas price of the VRF coordinator mock, in LINK base units
const VRF_GAS_PRICE_LINK: u128 = 1_000_000_000;

/// Stand-ins for third party contracts, deployed on local chains only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockContract {
    /// LINK token
    LinkToken,
    /// Chainlink oracle
    Oracle,
    /// Price feed aggregator
    PriceFeed,
    /// VRF coordinator
    VrfCoordinator,
}

impl MockContract {
    /// Artifact name of the mock
    pub fn artifact_name(&self) -> &'static str {
        match self {
            MockContract::LinkToken => "MockLINKToken",
            MockContract::Oracle => "MockOracle",
            MockContract::PriceFeed => "MockV3Aggregator",
            MockContract::VrfCoordinator => "VRFCoordinatorV2Mock",
        }
    }
}

/// Logical contract name to the mock that stands in for it
pub fn contract_name_to_mock(contract_name: &str) -> Option<MockContract> {
    match contract_name {
        "link_token" => Some(MockContract::LinkToken),
        "oracle" => Some(MockContract::Oracle),
        "eth_usd_price_feed" => Some(MockContract::PriceFeed),
        "vrf_coordinator" => Some(MockContract::VrfCoordinator),
        _ => None,
    }
}

/// Deploy the whole mock bundle, the oracle pointing at the fresh LINK token
pub async fn deploy_contract_mocks(session: &mut Session) -> Result<(), ScriptError> {
    info!("Deploying Contract Mocks...");

    info!("Deploying Mock LINK Token...");
    let link_token = deploy_mock(session, MockContract::LinkToken, Vec::new()).await?;

    info!("Deploying Mock Oracle...");
    let oracle_args = MockOracle::constructorCall { link: link_token }.abi_encode();
    deploy_mock(session, MockContract::Oracle, oracle_args).await?;

    info!("Deploying Mock Price Feed...");
    let price_feed_args = MockV3Aggregator::constructorCall {
        decimals: TOKEN_DECIMALS,
        initialAnswer: I256::from_raw(to_wei("3000")?),
    }
    .abi_encode();
    deploy_mock(session, MockContract::PriceFeed, price_feed_args).await?;

    info!("Deploying Mock VRFCoordinator...");
    deploy_mock(
        session,
        MockContract::VrfCoordinator,
        vrf_coordinator_constructor_args(),
    )
    .await?;

    info!("Contract Mocks Deployed!");
    Ok(())
}

/// 0.1 LINK base fee, 1 gwei of LINK per gas
fn vrf_coordinator_constructor_args() -> Vec<u8> {
    VRFCoordinatorV2Mock::constructorCall {
        baseFee: VRF_BASE_FEE,
        gasPriceLink: VRF_GAS_PRICE_LINK,
    }
    .abi_encode()
}

/// Deploy one mock, recorded under its artifact name
async fn deploy_mock(
    session: &mut Session,
    mock: MockContract,
    constructor_args: Vec<u8>,
) -> Result<Address, ScriptError> {
    let name = mock.artifact_name();
    deploy_contract(session, name, name, constructor_args, false).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_logical_names_to_mocks() {
        assert_eq!(contract_name_to_mock("link_token"), Some(MockContract::LinkToken));
        assert_eq!(
            contract_name_to_mock("eth_usd_price_feed").map(|mock| mock.artifact_name()),
            Some("MockV3Aggregator")
        );
        assert_eq!(
            contract_name_to_mock("vrf_coordinator").map(|mock| mock.artifact_name()),
            Some("VRFCoordinatorV2Mock")
        );
        assert_eq!(contract_name_to_mock("busd_token"), None);
    }

    #[test]
    fn vrf_coordinator_arguments_are_two_words() {
        let args = vrf_coordinator_constructor_args();
        assert_eq!(args.len(), 64);
        let base_fee = alloy::primitives::U256::from_be_slice(&args[..32]);
        let gas_price_link = alloy::primitives::U256::from_be_slice(&args[32..]);
        assert_eq!(base_fee, alloy::primitives::U256::from(VRF_BASE_FEE));
        assert_eq!(gas_price_link, alloy::primitives::U256::from(1_000_000_000u64));
    }
}
