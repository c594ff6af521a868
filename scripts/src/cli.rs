//! Definitions of CLI arguments and commands for the Savvy Finance scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::{
    commands,
    constants::DEFAULT_CONFIG_FILE,
    deploy::savvy::DeployTarget,
    errors::ScriptError,
    session::{Session, SessionOptions},
};

/// Scripts for deploying & operating the Savvy Finance contracts
#[derive(Parser)]
pub struct Cli {
    /// Network to work on, the configured default network when omitted
    #[arg(short, long, env = "SAVVY_NETWORK")]
    pub network: Option<String>,

    /// Path of the project configuration
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Index of the local test account to sign with
    #[arg(long, default_value_t = 0)]
    pub account_index: u32,

    /// Keystore id of the account to sign with on live networks
    #[arg(long)]
    pub account_id: Option<String>,

    /// Network RPC URL, overrides the configured one
    #[arg(short, long)]
    pub rpc_url: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Connection options taken from the global arguments
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            network: self.network.clone(),
            rpc_url: self.rpc_url.clone(),
            account_index: self.account_index,
            account_id: self.account_id.clone(),
        }
    }
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the LINK token, oracle, price feed and VRF coordinator mocks
    DeployMocks,
    /// Deploy the Savvy Finance contracts behind their proxies
    DeployContracts(DeployContractsArgs),
    /// Print the farm tokens, stakers, positions and balances
    Status,
    /// Print the farm data of tokens
    TokensData(TokenSelectionArgs),
    /// Print the farm data of stakers
    StakersData(StakersArgs),
    /// Print the position of every staker on every token
    TokensStakersData(TokensStakersArgs),
    /// Print the Savvy Finance token balances of the farm and of the account
    Balances,
    /// Register tokens on the farm
    AddTokens(TokenSelectionArgs),
    /// Activate registered tokens
    ActivateTokens(TokenSelectionArgs),
    /// Deactivate registered tokens
    DeactivateTokens(TokenSelectionArgs),
    /// Let stakers pick their reward token
    EnableMultiReward(TokenSelectionArgs),
    /// Reward stakers in the staked token
    DisableMultiReward(TokenSelectionArgs),
    /// Name the token categories, in category number order
    SetTokenCategories(SetTokenCategoriesArgs),
    /// Push market prices to the farm
    SetTokensPrices(SetTokensPricesArgs),
    /// Set the reward token of a token
    SetTokenRewardToken(RewardTokenArgs),
    /// Deposit reward liquidity
    Deposit(TokenAmountArgs),
    /// Withdraw reward liquidity
    Withdraw(TokenAmountArgs),
    /// Set the reward token of the account's stake
    SetStakingRewardToken(RewardTokenArgs),
    /// Stake tokens from the account
    Stake(TokenAmountArgs),
    /// Unstake tokens to the account
    Unstake(TokenAmountArgs),
    /// Withdraw accrued rewards, `token` being the reward token
    WithdrawStakingReward(TokenAmountArgs),
    /// Pay out the pending staking rewards
    IssueStakingRewards,
    /// Stop charging fees to an account
    ExcludeFromFees(AccountArgs),
    /// Charge fees to an account again
    IncludeInFees(AccountArgs),
    /// Print the market price of a token on the price network
    TokenPrice(PriceArgs),
    /// Print the market price of an LP token on the price network
    LpTokenPrice(PriceArgs),
    /// Send LINK from the account
    FundWithLink(FundWithLinkArgs),
    /// Deploy a new implementation and upgrade its proxy to it
    Upgrade(UpgradeArgs),
    /// Copy the build, configuration and token list into the front end
    UpdateFrontEnd(TokenSelectionArgs),
    /// Set up the legacy staking contract
    StakingSetup(StakingSetupArgs),
}

impl Command {
    /// Run the command
    pub async fn run(self, session: &mut Session) -> Result<(), ScriptError> {
        match self {
            Command::DeployMocks => {
                info!("Deploying mocks...");
                commands::deploy_mocks(session).await
            }
            Command::DeployContracts(args) => {
                info!("Deploying contracts...");
                commands::deploy_contracts(args, session).await
            }
            Command::Status => commands::status(session).await,
            Command::TokensData(args) => commands::tokens_data(args, session).await,
            Command::StakersData(args) => commands::stakers_data(args, session).await,
            Command::TokensStakersData(args) => commands::tokens_stakers_data(args, session).await,
            Command::Balances => commands::balances(session).await,
            Command::AddTokens(args) => commands::add_tokens(args, session).await,
            Command::ActivateTokens(args) => commands::activate_tokens(args, session).await,
            Command::DeactivateTokens(args) => commands::deactivate_tokens(args, session).await,
            Command::EnableMultiReward(args) => commands::enable_multi_reward(args, session).await,
            Command::DisableMultiReward(args) => {
                commands::disable_multi_reward(args, session).await
            }
            Command::SetTokenCategories(args) => {
                commands::set_token_categories(args, session).await
            }
            Command::SetTokensPrices(args) => commands::set_tokens_prices(args, session).await,
            Command::SetTokenRewardToken(args) => {
                commands::set_token_reward_token(args, session).await
            }
            Command::Deposit(args) => commands::deposit(args, session).await,
            Command::Withdraw(args) => commands::withdraw(args, session).await,
            Command::SetStakingRewardToken(args) => {
                commands::set_staking_reward_token(args, session).await
            }
            Command::Stake(args) => commands::stake(args, session).await,
            Command::Unstake(args) => commands::unstake(args, session).await,
            Command::WithdrawStakingReward(args) => {
                commands::withdraw_staking_reward(args, session).await
            }
            Command::IssueStakingRewards => commands::issue_staking_rewards(session).await,
            Command::ExcludeFromFees(args) => commands::exclude_from_fees(args, session).await,
            Command::IncludeInFees(args) => commands::include_in_fees(args, session).await,
            Command::TokenPrice(args) => commands::token_price(args, session).await,
            Command::LpTokenPrice(args) => commands::lp_token_price(args, session).await,
            Command::FundWithLink(args) => commands::fund_with_link(args, session).await,
            Command::Upgrade(args) => {
                info!("Upgrading {:?}...", args.target);
                commands::upgrade(args, session).await
            }
            Command::UpdateFrontEnd(args) => commands::front_end(args, session).await,
            Command::StakingSetup(args) => {
                info!("Setting up staking...");
                commands::staking_setup(args, session).await
            }
        }
    }
}

/// Deploy contracts
#[derive(Args)]
pub struct DeployContractsArgs {
    /// What to deploy
    #[arg(short, long, value_enum, default_value_t = DeployTarget::All)]
    pub target: DeployTarget,
}

/// Tokens by logical name (`svf`, `wbnb`, `wbnb_busd`, ...) or address
#[derive(Args)]
pub struct TokenSelectionArgs {
    /// Token to include, repeatable; every farm token when omitted
    #[arg(short, long = "token")]
    pub tokens: Vec<String>,
}

/// Stakers selection
#[derive(Args)]
pub struct StakersArgs {
    /// Staker address, repeatable; every farm staker when omitted
    #[arg(short, long = "staker")]
    pub stakers: Vec<String>,
}

/// Tokens and stakers selection
#[derive(Args)]
pub struct TokensStakersArgs {
    /// Token to include, repeatable; every farm token when omitted
    #[arg(short, long = "token")]
    pub tokens: Vec<String>,
    /// Staker address, repeatable; every farm staker when omitted
    #[arg(short, long = "staker")]
    pub stakers: Vec<String>,
}

/// Token category names
#[derive(Args)]
pub struct SetTokenCategoriesArgs {
    /// Category names, the first one being category 0
    #[arg(default_values_t = ["DEFAULT".to_string(), "LP".to_string()])]
    pub categories: Vec<String>,
}

/// Tokens to price
#[derive(Args)]
pub struct SetTokensPricesArgs {
    /// Tokens to price
    #[command(flatten)]
    pub selection: TokenSelectionArgs,
    /// Price every selected token as an LP token configured as `<name>_token`
    #[arg(long)]
    pub lp: bool,
}

/// A token and its reward token
#[derive(Args)]
pub struct RewardTokenArgs {
    /// Token whose reward token is set
    pub token: String,
    /// Reward token, by logical name or address
    pub reward_token: String,
}

/// A token and an amount of it
#[derive(Args)]
pub struct TokenAmountArgs {
    /// Token by logical name or address
    pub token: String,
    /// Decimal amount of tokens, e.g. `1000` or `0.5`
    pub amount: String,
}

/// Fee exclusion target
#[derive(Args)]
pub struct AccountArgs {
    /// Account address, the signing account when omitted
    pub account: Option<String>,
}

/// Token to price
#[derive(Args)]
pub struct PriceArgs {
    /// Contract name on the price network, e.g. `wbnb_token`
    pub contract_name: String,
}

/// LINK transfer
#[derive(Args)]
pub struct FundWithLinkArgs {
    /// Recipient, the farm when omitted
    #[arg(long)]
    pub to: Option<String>,
    /// Decimal amount of LINK
    #[arg(long, default_value = "0.1")]
    pub amount: String,
}

/// Contracts that sit behind an upgradeable proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UpgradeTarget {
    /// The farm, behind its proxy
    Farm,
    /// The upgradeable token, behind its proxy
    Token,
}

/// Implementation upgrade
#[derive(Args)]
pub struct UpgradeArgs {
    /// Contract to upgrade
    #[arg(value_enum)]
    pub target: UpgradeTarget,
    /// Call `initialize()` along with the upgrade, farm only
    #[arg(long)]
    pub initialize: bool,
    /// Upgrade through the proxy itself instead of the proxy admin
    #[arg(long)]
    pub without_admin: bool,
}

/// Legacy staking setup
#[derive(Args)]
pub struct StakingSetupArgs {
    /// Deploy a new token and staking contract instead of using the latest ones
    #[arg(long)]
    pub deploy: bool,
    /// Configured contract name of a token to push the market price of, repeatable
    #[arg(long = "price")]
    pub price_tokens: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_options_reach_the_session() {
        let cli = Cli::parse_from([
            "savvy-scripts",
            "--network",
            "bsc-test",
            "--account-id",
            "deployer",
            "status",
        ]);
        let options = cli.session_options();
        assert_eq!(options.network.as_deref(), Some("bsc-test"));
        assert_eq!(options.account_id.as_deref(), Some("deployer"));
        assert_eq!(options.account_index, 0);
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn deploy_target_defaults_to_all() {
        let cli = Cli::parse_from(["savvy-scripts", "deploy-contracts"]);
        match cli.command {
            Command::DeployContracts(args) => assert_eq!(args.target, DeployTarget::All),
            _ => panic!("expected deploy-contracts"),
        }

        let cli = Cli::parse_from(["savvy-scripts", "deploy-contracts", "--target", "farm"]);
        match cli.command {
            Command::DeployContracts(args) => assert_eq!(args.target, DeployTarget::Farm),
            _ => panic!("expected deploy-contracts"),
        }
    }

    #[test]
    fn categories_default_to_default_and_lp() {
        let cli = Cli::parse_from(["savvy-scripts", "set-token-categories"]);
        match cli.command {
            Command::SetTokenCategories(args) => assert_eq!(args.categories, ["DEFAULT", "LP"]),
            _ => panic!("expected set-token-categories"),
        }
    }

    #[test]
    fn token_selection_is_repeatable() {
        let cli = Cli::parse_from(["savvy-scripts", "add-tokens", "-t", "svf", "-t", "wbnb_busd"]);
        match cli.command {
            Command::AddTokens(args) => assert_eq!(args.tokens, ["svf", "wbnb_busd"]),
            _ => panic!("expected add-tokens"),
        }
    }
}
