//! Market prices: single tokens from the public price API, LP tokens from their reserves.

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
};
use reqwest::Client;
use tracing::debug;

use crate::{
    config::Config,
    errors::ScriptError,
    network::Network,
    tx::{
        abi::IPancakePair,
        client::{create_read_provider, HttpTransport, ReadProvider},
    },
    units::from_wei,
};

/// Client of the `GET {base_url}/{address}` price API
pub struct PriceClient {
    /// HTTP client
    http: Client,
    /// Price API URL, without trailing slash
    base_url: String,
}

impl PriceClient {
    /// Client of the API at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// USD price of a token
    pub async fn get_token_price(&self, token: Address) -> Result<f64, ScriptError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), token.to_checksum(None));
        debug!("Fetching price from {}", url);

        let body = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ScriptError::PriceFeed(e.to_string()))?
            .error_for_status()
            .map_err(|e| ScriptError::PriceFeed(e.to_string()))?
            .text()
            .await
            .map_err(|e| ScriptError::PriceFeed(e.to_string()))?;

        parse_price_response(&body)
    }

    /// USD price of an LP token: value of both reserves over the LP supply.
    /// Pair reads go through `provider`, which must be on the pair's network.
    pub async fn get_lp_token_price<P>(&self, provider: P, lp_token: Address) -> Result<f64, ScriptError>
    where
        P: Provider<HttpTransport>,
    {
        let pair = IPancakePair::new(lp_token, provider);

        let supply = pair
            .totalSupply()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;
        let token0 = pair
            .token0()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;
        let token1 = pair
            .token1()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;
        let reserves = pair
            .getReserves()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        let price0 = self.get_token_price(token0).await?;
        let price1 = self.get_token_price(token1).await?;

        lp_token_price(
            reserve_amount(reserves.reserve0),
            reserve_amount(reserves.reserve1),
            price0,
            price1,
            from_wei(supply),
        )
    }
}

/// Prices of farm tokens by logical name, looked up with the addresses of the price network.
///
/// A name without `_` is a single token configured as `<name>_token`, a name
/// with `_` is an LP token configured as `<name>_lp_token`.
pub struct MarketPrices<'a> {
    /// Configuration holding the price network addresses
    config: &'a Config,
    /// Price network name
    network: String,
    /// Price API client
    client: PriceClient,
    /// Only LP prices need chain reads
    provider: Option<ReadProvider>,
}

impl<'a> MarketPrices<'a> {
    /// Prices on the configured price network
    pub fn new(config: &'a Config) -> Result<Self, ScriptError> {
        let network = Network::new(config.project.price_network.clone());
        let provider = match network.rpc_url(config, None) {
            Ok(rpc_url) => Some(create_read_provider(&rpc_url)?),
            Err(_) => None,
        };
        Ok(Self {
            config,
            network: network.name,
            client: PriceClient::new(config.project.price_api_url.clone()),
            provider,
        })
    }

    /// USD price of the farm token `token_name`
    pub async fn token_price(&self, token_name: &str) -> Result<f64, ScriptError> {
        if is_lp_token_name(token_name) {
            let lp_token = self
                .config
                .get_contract_address(&format!("{token_name}_lp_token"), &self.network)?;
            self.client
                .get_lp_token_price(self.provider()?, lp_token)
                .await
        } else {
            let token = self
                .config
                .get_contract_address(&format!("{token_name}_token"), &self.network)?;
            self.client.get_token_price(token).await
        }
    }

    /// Price of a single token configured under exactly `contract_name`
    pub async fn configured_token_price(&self, contract_name: &str) -> Result<f64, ScriptError> {
        let token = self.config.get_contract_address(contract_name, &self.network)?;
        self.client.get_token_price(token).await
    }

    /// Price of an LP token configured as `<name>_token`
    pub async fn lp_token_price(&self, token_name: &str) -> Result<f64, ScriptError> {
        self.configured_lp_token_price(&format!("{token_name}_token"))
            .await
    }

    /// Price of an LP token configured under exactly `contract_name`
    pub async fn configured_lp_token_price(&self, contract_name: &str) -> Result<f64, ScriptError> {
        let lp_token = self.config.get_contract_address(contract_name, &self.network)?;
        self.client
            .get_lp_token_price(self.provider()?, lp_token)
            .await
    }

    /// The API client
    pub fn client(&self) -> &PriceClient {
        &self.client
    }

    /// Read-only client on the price network
    pub fn provider(&self) -> Result<ReadProvider, ScriptError> {
        self.provider.clone().ok_or_else(|| {
            ScriptError::Config(format!("no rpc_url configured for {} network", self.network))
        })
    }
}

/// Pair reserves are `uint112`, bound as `u128`
fn reserve_amount(reserve: u128) -> f64 {
    from_wei(U256::from(reserve))
}

/// LP token names join their pair with `_`, e.g. `wbnb_busd`
pub fn is_lp_token_name(token_name: &str) -> bool {
    token_name.contains('_')
}

/// `(reserve0 * price0 + reserve1 * price1) / supply`
pub fn lp_token_price(
    reserve0: f64,
    reserve1: f64,
    price0: f64,
    price1: f64,
    supply: f64,
) -> Result<f64, ScriptError> {
    if supply <= 0.0 {
        return Err(ScriptError::PriceFeed("LP token has no supply".to_string()));
    }
    Ok((reserve0 * price0 + reserve1 * price1) / supply)
}

/// Extract `data.price`, which the API sends as a string
pub fn parse_price_response(body: &str) -> Result<f64, ScriptError> {
    let parsed = json::parse(body).map_err(|e| ScriptError::PriceFeed(e.to_string()))?;
    let price = &parsed["data"]["price"];

    price
        .as_str()
        .and_then(|raw| raw.parse::<f64>().ok())
        .or_else(|| price.as_f64())
        .ok_or_else(|| ScriptError::PriceFeed(format!("no data.price in response: {}", body)))
}
