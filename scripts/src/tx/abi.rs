//! Solidity bindings for the contracts the scripts talk to.

use alloy::sol;

sol! {
#[sol(rpc)]
interface ISavvyFinanceFarm {
    struct TokenData {
        bool isActive;
        bool hasMultiReward;
        string name;
        uint256 category;
        uint256 price;
        uint256 rewardBalance;
        uint256 stakingBalance;
        uint256 stakeFee;
        uint256 unstakeFee;
        uint256 stakingApr;
        address rewardToken;
        address admin;
        uint256 timestampAdded;
        uint256 timestampLastUpdated;
    }

    struct StakerData {
        bool isActive;
        uint256 uniqueTokensStaked;
        uint256 timestampAdded;
        uint256 timestampLastUpdated;
    }

    struct StakingRewardData {
        uint256 id;
        address staker;
        address stakedToken;
        uint256 stakedTokenPrice;
        uint256 stakedTokenAmount;
        address rewardToken;
        uint256 rewardTokenPrice;
        uint256 rewardTokenAmount;
        uint256 stakingDurationInSeconds;
        string[2] actionPerformed;
        uint256 timestampAdded;
        uint256 timestampLastUpdated;
    }

    struct TokenStakerData {
        uint256 rewardBalance;
        uint256 stakingBalance;
        address stakingRewardToken;
        StakingRewardData[] stakingRewards;
        uint256 timestampLastRewarded;
        uint256 timestampAdded;
        uint256 timestampLastUpdated;
    }

    function getTokens() external view returns (address[] memory);
    function getStakers() external view returns (address[] memory);
    function getTokenData(address token) external view returns (TokenData memory);
    function getStakerData(address staker) external view returns (StakerData memory);
    function getTokenStakerData(address token, address staker) external view returns (TokenStakerData memory);
    function calculateStakerStakingRewardValue(address staker, address token) external view returns (uint256);

    function initialize() external;
    function excludeFromFees(address account) external;
    function includeInFees(address account) external;
    function setTokenCategoryNumberToName(uint256 categoryNumber, string memory categoryName) external;
    function addToken(
        address token,
        string memory name,
        uint256 category,
        uint256 stakeFee,
        uint256 unstakeFee,
        uint256 stakingApr,
        address rewardToken,
        address admin
    ) external;
    function activateToken(address token) external;
    function deactivateToken(address token) external;
    function enableTokenMultiReward(address token) external;
    function disableTokenMultiReward(address token) external;
    function setTokenPrice(address token, uint256 price) external;
    function setTokenRewardToken(address token, address rewardToken) external;
    function depositToken(address token, uint256 amount) external;
    function withdrawToken(address token, uint256 amount) external;
    function setStakingRewardToken(address token, address rewardToken) external;
    function stakeToken(address token, uint256 amount) external;
    function unstakeToken(address token, uint256 amount) external;
    function withdrawStakingReward(address rewardToken, uint256 amount) external;
    function issueStakingRewards() external;
}
}

sol! {
#[sol(rpc)]
interface ISavvyFinanceStaking {
    function tokens(uint256 index) external view returns (address);
    function stakers(uint256 index) external view returns (address);
    function tokenIsActive(address token) external view returns (bool);
    function tokensStakersBalances(address token, address staker) external view returns (uint256);
    function stakersUniqueTokensStaked(address staker) external view returns (uint256);
    function tokensData(address token) external view returns (address admin, uint256 price);

    function addToken(address token, address admin) external;
    function removeToken(address token) external;
    function activateToken(address token) external;
    function setTokenPrice(address token, uint256 price) external;
    function stakeToken(address token, uint256 amount, address rewardToken) external;
    function unstakeToken(address token, uint256 amount, address rewardToken) external;
    function rewardStakers() external;
}
}

sol! {
#[sol(rpc)]
interface IERC20 {
    function symbol() external view returns (string memory);
    function totalSupply() external view returns (uint256);
    function balanceOf(address account) external view returns (uint256);
    function approve(address spender, uint256 amount) external returns (bool);
    function transfer(address to, uint256 amount) external returns (bool);
}
}

sol! {
#[sol(rpc)]
interface IPancakePair {
    function totalSupply() external view returns (uint256);
    function token0() external view returns (address);
    function token1() external view returns (address);
    function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
}
}

sol! {
interface IProxyAdmin {
    function upgrade(address proxy, address implementation) external;
    function upgradeAndCall(address proxy, address implementation, bytes memory data) external payable;
}

interface ITransparentUpgradeableProxy {
    function upgradeTo(address newImplementation) external;
    function upgradeToAndCall(address newImplementation, bytes memory data) external payable;
}

interface ISavvyFinanceUpgradeable {
    function initialize(uint256 initialSupply) external;
}
}

// Constructors of the contracts deployed from build artifacts
sol! {
contract SavvyFinance {
    constructor(uint256 initialSupply);
}

contract TransparentUpgradeableProxy {
    constructor(address logic, address admin, bytes memory data);
}

contract MockOracle {
    constructor(address link);
}

contract MockV3Aggregator {
    constructor(uint8 decimals, int256 initialAnswer);
}

contract VRFCoordinatorV2Mock {
    constructor(uint96 baseFee, uint96 gasPriceLink);
}
}
