//! Constants used in the Savvy Finance scripts

/// Default project configuration file
pub const DEFAULT_CONFIG_FILE: &str = "savvy-config.toml";

/// Default RPC endpoint for local chains
pub const DEFAULT_LOCAL_RPC: &str = "http://127.0.0.1:8545";

/// Local chains where mocks are deployed instead of using live addresses
pub const NON_FORKED_LOCAL_BLOCKCHAIN_ENVIRONMENTS: [&str; 3] = ["development", "ganache", "hardhat"];

/// Local chains forked from a public network
pub const FORKED_LOCAL_BLOCKCHAIN_ENVIRONMENTS: [&str; 2] = ["mainnet-fork", "bsc-main-fork"];

/// Public chains holding real value, where mocks are never deployed
pub const MAINNET_BLOCKCHAIN_ENVIRONMENTS: [&str; 2] = ["mainnet", "bsc-main"];

/// Mnemonic of the pre-funded accounts on anvil and hardhat nodes
pub const DEFAULT_LOCAL_MNEMONIC: &str =
    "test test test test test test test test test test test junk";

/// Public token price API, queried as `{url}/{token_address}`
pub const DEFAULT_PRICE_API_URL: &str = "https://api.pancakeswap.info/api/v2/tokens";

/// Network whose configured addresses are used to look up market prices
pub const DEFAULT_PRICE_NETWORK: &str = "bsc-main";

/// Decimals of every token handled by the farm
pub const TOKEN_DECIMALS: u8 = 18;

/// Initial supply of the Savvy Finance token, in whole tokens
pub const SAVVY_FINANCE_INITIAL_SUPPLY: &str = "1000000";

/// Number of confirmations every transaction waits for
pub const REQUIRED_CONFIRMATIONS: u64 = 1;

/// Name of the deployment history file inside the build directory
pub const DEPLOYMENTS_FILE: &str = "deployments.json";
