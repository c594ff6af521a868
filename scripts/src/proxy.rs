//! Transparent upgradeable proxy deployment and upgrades.
//!
//! The initializer payload travels with the proxy creation or the upgrade
//! transaction, so it runs exactly once and atomically with it.

use alloy::{
    primitives::{Address, Bytes, TxHash},
    sol_types::{SolCall, SolConstructor},
};
use tracing::info;

use crate::{
    deploy::deploy::deploy_contract,
    errors::ScriptError,
    session::Session,
    tx::{
        abi::{IProxyAdmin, ITransparentUpgradeableProxy, TransparentUpgradeableProxy},
        client::RpcProvider,
        sender::send_call,
    },
};

/// Artifact name of the proxy contract
pub const PROXY_CONTRACT: &str = "TransparentUpgradeableProxy";

/// Encode an initializer call, or nothing when there is no initializer
pub fn encode_function_data<C: SolCall>(initializer: Option<&C>) -> Bytes {
    initializer
        .map(|call| Bytes::from(call.abi_encode()))
        .unwrap_or_default()
}

/// History key of the proxy fronting `implementation_name`
pub fn proxy_history_key(implementation_name: &str) -> String {
    format!("{PROXY_CONTRACT}:{implementation_name}")
}

/// Deploy a proxy in front of `implementation`, administered by `proxy_admin`,
/// running `initializer_data` in its constructor
pub async fn deploy_transparent_upgradeable_proxy(
    session: &mut Session,
    proxy_admin: Address,
    implementation: Address,
    implementation_name: &str,
    initializer_data: Bytes,
) -> Result<Address, ScriptError> {
    let constructor_args = TransparentUpgradeableProxy::constructorCall {
        logic: implementation,
        admin: proxy_admin,
        data: initializer_data,
    }
    .abi_encode();

    deploy_contract(
        session,
        PROXY_CONTRACT,
        &proxy_history_key(implementation_name),
        constructor_args,
        false,
    )
    .await
}

/// Point `proxy` at `new_implementation`, through the proxy admin when there is one,
/// calling `initializer_data` along with the upgrade when given
pub async fn upgrade(
    client: &RpcProvider,
    proxy: Address,
    new_implementation: Address,
    proxy_admin: Option<Address>,
    initializer_data: Option<Bytes>,
) -> Result<TxHash, ScriptError> {
    let tx_hash = match (proxy_admin, initializer_data) {
        (Some(admin), Some(data)) => {
            send_call(
                client,
                admin,
                &IProxyAdmin::upgradeAndCallCall {
                    proxy,
                    implementation: new_implementation,
                    data,
                },
            )
            .await?
        }
        (Some(admin), None) => {
            send_call(
                client,
                admin,
                &IProxyAdmin::upgradeCall {
                    proxy,
                    implementation: new_implementation,
                },
            )
            .await?
        }
        (None, Some(data)) => {
            send_call(
                client,
                proxy,
                &ITransparentUpgradeableProxy::upgradeToAndCallCall {
                    newImplementation: new_implementation,
                    data,
                },
            )
            .await?
        }
        (None, None) => {
            send_call(
                client,
                proxy,
                &ITransparentUpgradeableProxy::upgradeToCall {
                    newImplementation: new_implementation,
                },
            )
            .await?
        }
    };
    info!("Proxy {:#x} upgraded to {:#x}", proxy, new_implementation);

    Ok(tx_hash)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;

    use super::*;
    use crate::tx::abi::{ISavvyFinanceFarm, ISavvyFinanceUpgradeable};

    #[test]
    fn no_initializer_encodes_nothing() {
        assert!(encode_function_data::<ISavvyFinanceFarm::initializeCall>(None).is_empty());
    }

    #[test]
    fn initializer_is_selector_plus_arguments() {
        let call = ISavvyFinanceUpgradeable::initializeCall {
            initialSupply: U256::from(1u64),
        };
        let data = encode_function_data(Some(&call));
        assert_eq!(data.len(), 4 + 32);
        assert_eq!(&data[..4], ISavvyFinanceUpgradeable::initializeCall::SELECTOR.as_slice());
        assert_eq!(data[35], 1);
    }

    #[test]
    fn argumentless_initializer_is_only_the_selector() {
        let data = encode_function_data(Some(&ISavvyFinanceFarm::initializeCall {}));
        assert_eq!(data.as_ref(), ISavvyFinanceFarm::initializeCall::SELECTOR.as_slice());
    }

    #[test]
    fn proxies_are_keyed_by_implementation() {
        assert_eq!(
            proxy_history_key("SavvyFinanceFarm"),
            "TransparentUpgradeableProxy:SavvyFinanceFarm"
        );
    }
}
