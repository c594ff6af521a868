use alloy::{primitives::Address, sol_types::SolConstructor};
use tracing::info;

use crate::{
    constants::SAVVY_FINANCE_INITIAL_SUPPLY,
    deploy::deploy::deploy_contract,
    errors::ScriptError,
    proxy::{deploy_transparent_upgradeable_proxy, encode_function_data, proxy_history_key},
    session::Session,
    tx::abi::{ISavvyFinanceFarm, ISavvyFinanceUpgradeable, SavvyFinance},
    units::to_wei,
};

/// Artifact of the non upgradeable token
pub const SAVVY_FINANCE: &str = "SavvyFinance";
/// Artifact of the upgradeable token
pub const SAVVY_FINANCE_UPGRADEABLE: &str = "SavvyFinanceUpgradeable";
/// Artifact of the farm
pub const SAVVY_FINANCE_FARM: &str = "SavvyFinanceFarm";
/// Artifact of the legacy staking contract
pub const SAVVY_FINANCE_STAKING: &str = "SavvyFinanceStaking";
/// Artifact of the proxy admin
pub const PROXY_ADMIN: &str = "ProxyAdmin";

/// Which contracts `get_contracts` deploys before resolving them
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DeployTarget {
    /// Proxy admin, token and farm, each behind a proxy
    All,
    /// A new farm behind a new proxy, reusing the token
    Farm,
}

/// The deployed Savvy Finance contracts, token and farm addressed through their proxies
#[derive(Debug, Clone, Copy)]
pub struct SavvyContracts {
    /// Admin of both proxies
    pub proxy_admin: Address,
    /// Token proxy
    pub token: Address,
    /// Farm proxy
    pub farm: Address,
}

/// Admin of the upgradeable proxies
pub async fn deploy_proxy_admin(session: &mut Session) -> Result<Address, ScriptError> {
    deploy_contract(session, PROXY_ADMIN, PROXY_ADMIN, Vec::new(), false).await
}

/// Non upgradeable token, minting the initial supply to the deployer
pub async fn deploy_savvy_finance(session: &mut Session) -> Result<Address, ScriptError> {
    let constructor_args = SavvyFinance::constructorCall {
        initialSupply: to_wei(SAVVY_FINANCE_INITIAL_SUPPLY)?,
    }
    .abi_encode();
    deploy_contract(session, SAVVY_FINANCE, SAVVY_FINANCE, constructor_args, true).await
}

/// Upgradeable token implementation
pub async fn deploy_savvy_finance_upgradeable(session: &mut Session) -> Result<Address, ScriptError> {
    deploy_contract(
        session,
        SAVVY_FINANCE_UPGRADEABLE,
        SAVVY_FINANCE_UPGRADEABLE,
        Vec::new(),
        false,
    )
    .await
}

/// Farm implementation
pub async fn deploy_savvy_finance_farm(session: &mut Session) -> Result<Address, ScriptError> {
    deploy_contract(session, SAVVY_FINANCE_FARM, SAVVY_FINANCE_FARM, Vec::new(), true).await
}

/// Legacy staking contract
pub async fn deploy_savvy_finance_staking(session: &mut Session) -> Result<Address, ScriptError> {
    deploy_contract(
        session,
        SAVVY_FINANCE_STAKING,
        SAVVY_FINANCE_STAKING,
        Vec::new(),
        true,
    )
    .await
}

/// Deploy what `deploy` asks for, then resolve the proxy admin, token proxy and farm proxy
pub async fn get_contracts(
    session: &mut Session,
    deploy: Option<DeployTarget>,
) -> Result<SavvyContracts, ScriptError> {
    match deploy {
        Some(DeployTarget::All) => {
            let proxy_admin = deploy_proxy_admin(session).await?;

            let token = deploy_savvy_finance_upgradeable(session).await?;
            let token_initializer = ISavvyFinanceUpgradeable::initializeCall {
                initialSupply: to_wei(SAVVY_FINANCE_INITIAL_SUPPLY)?,
            };
            deploy_transparent_upgradeable_proxy(
                session,
                proxy_admin,
                token,
                SAVVY_FINANCE_UPGRADEABLE,
                encode_function_data(Some(&token_initializer)),
            )
            .await?;

            deploy_farm_behind_proxy(session, proxy_admin).await?;
        }
        Some(DeployTarget::Farm) => {
            let proxy_admin = latest_deployment(session, PROXY_ADMIN)?;
            deploy_farm_behind_proxy(session, proxy_admin).await?;
        }
        None => {}
    }

    let contracts = SavvyContracts {
        proxy_admin: latest_deployment(session, PROXY_ADMIN)?,
        token: latest_deployment(session, &proxy_history_key(SAVVY_FINANCE_UPGRADEABLE))?,
        farm: latest_deployment(session, &proxy_history_key(SAVVY_FINANCE_FARM))?,
    };
    info!(
        "Using proxy admin {:#x}, token {:#x}, farm {:#x}",
        contracts.proxy_admin, contracts.token, contracts.farm
    );

    Ok(contracts)
}

/// New farm implementation behind a new initialized proxy
async fn deploy_farm_behind_proxy(
    session: &mut Session,
    proxy_admin: Address,
) -> Result<Address, ScriptError> {
    let farm = deploy_savvy_finance_farm(session).await?;
    deploy_transparent_upgradeable_proxy(
        session,
        proxy_admin,
        farm,
        SAVVY_FINANCE_FARM,
        encode_function_data(Some(&ISavvyFinanceFarm::initializeCall {})),
    )
    .await
}

/// `Contract[-1]` from the deployment history
pub fn latest_deployment(session: &Session, history_key: &str) -> Result<Address, ScriptError> {
    session
        .history
        .latest(history_key)
        .ok_or_else(|| ScriptError::ContractNotFound {
            name: history_key.to_string(),
            network: session.network.name.clone(),
        })
}
