//! Contract ABIs and conversions between ABI and domain types

use alloy_primitives::{
    aliases::{I24, U160, U24},
    ruint::UintTryFrom,
    U256,
};
use alloy_sol_types::sol;
use soda_core::{CoreError, CoreResult, RawPool, RawPosition, TokenPair};

sol! {
    interface IERC20 {
        function symbol() external view returns (string memory symbol);
        function decimals() external view returns (uint8 decimals);
        function totalSupply() external view returns (uint256 supply);
        function balanceOf(address account) external view returns (uint256 balance);
        function allowance(address owner, address spender) external view returns (uint256 remaining);
        function approve(address spender, uint256 amount) external returns (bool success);
    }

    interface IPoolManager {
        struct PoolInfo {
            address pool;
            address token0;
            address token1;
            uint32 index;
            uint24 fee;
            uint8 feeProtocol;
            int24 tickLower;
            int24 tickUpper;
            int24 tick;
            uint160 sqrtPriceX96;
            uint128 liquidity;
        }

        struct Pair {
            address token0;
            address token1;
        }

        struct CreateAndInitializeParams {
            address token0;
            address token1;
            uint24 fee;
            int24 tickLower;
            int24 tickUpper;
            uint160 sqrtPriceX96;
        }

        function getAllPools() external view returns (PoolInfo[] memory poolsInfo);
        function getPairs() external view returns (Pair[] memory pairs);
        function createAndInitializePoolIfNecessary(CreateAndInitializeParams calldata params)
            external
            payable
            returns (address pool);
    }

    interface IPositionManager {
        struct PositionInfo {
            uint256 id;
            address owner;
            address token0;
            address token1;
            uint32 index;
            uint24 fee;
            uint128 liquidity;
            int24 tickLower;
            int24 tickUpper;
            uint128 tokensOwed0;
            uint128 tokensOwed1;
            uint256 feeGrowthInside0LastX128;
            uint256 feeGrowthInside1LastX128;
        }

        struct MintParams {
            address token0;
            address token1;
            uint32 index;
            uint256 amount0Desired;
            uint256 amount1Desired;
            address recipient;
            uint256 deadline;
        }

        function getAllPositions() external view returns (PositionInfo[] memory positionInfo);
        function mint(MintParams calldata params)
            external
            payable
            returns (uint256 positionId, uint128 liquidity, uint256 amount0, uint256 amount1);
        function collect(uint256 positionId, address recipient)
            external
            returns (uint128 amount0, uint128 amount1);
        function burn(uint256 positionId) external returns (uint256 amount0, uint256 amount1);
    }

    interface ISwapRouter {
        struct ExactInputParams {
            address tokenIn;
            address tokenOut;
            uint32[] indexPath;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }

        struct QuoteExactInputParams {
            address tokenIn;
            address tokenOut;
            uint32[] indexPath;
            uint256 amountIn;
            uint160 sqrtPriceLimitX96;
        }

        function exactInput(ExactInputParams calldata params) external payable returns (uint256 amountOut);
        function quoteExactInput(QuoteExactInputParams calldata params) external returns (uint256 amountOut);
    }
}

// ============================================================================
// Odd-width integer conversions
// ============================================================================

pub fn u24_to_u32(value: U24) -> u32 {
    value.to::<u32>()
}

pub fn u32_to_u24(value: u32) -> CoreResult<U24> {
    U24::try_from(value).map_err(|_| CoreError::UnsupportedFee(value))
}

pub fn i24_to_i32(value: I24) -> i32 {
    value.as_i32()
}

pub fn i32_to_i24(value: i32) -> CoreResult<I24> {
    // `TryFrom<i32>` does not range check negative input
    if !(-(1 << 23)..(1 << 23)).contains(&value) {
        return Err(CoreError::TickOutOfRange(value));
    }
    I24::try_from(value).map_err(|_| CoreError::TickOutOfRange(value))
}

pub fn u160_to_u256(value: U160) -> U256 {
    U256::from(value)
}

pub fn u256_to_u160(value: U256) -> CoreResult<U160> {
    U160::uint_try_from(value).map_err(|_| CoreError::Math(format!("{value} does not fit in uint160")))
}

// ============================================================================
// ABI -> domain
// ============================================================================

impl From<&IPoolManager::PoolInfo> for RawPool {
    fn from(info: &IPoolManager::PoolInfo) -> Self {
        RawPool {
            pool: info.pool,
            token0: info.token0,
            token1: info.token1,
            index: info.index,
            fee: u24_to_u32(info.fee),
            fee_protocol: info.feeProtocol,
            tick_lower: i24_to_i32(info.tickLower),
            tick_upper: i24_to_i32(info.tickUpper),
            tick: i24_to_i32(info.tick),
            sqrt_price_x96: u160_to_u256(info.sqrtPriceX96),
            liquidity: info.liquidity,
        }
    }
}

impl From<&IPoolManager::Pair> for TokenPair {
    fn from(pair: &IPoolManager::Pair) -> Self {
        TokenPair {
            token0: pair.token0,
            token1: pair.token1,
        }
    }
}

impl From<&IPositionManager::PositionInfo> for RawPosition {
    fn from(info: &IPositionManager::PositionInfo) -> Self {
        RawPosition {
            id: info.id,
            owner: info.owner,
            token0: info.token0,
            token1: info.token1,
            index: info.index,
            fee: u24_to_u32(info.fee),
            liquidity: info.liquidity,
            tick_lower: i24_to_i32(info.tickLower),
            tick_upper: i24_to_i32(info.tickUpper),
            tokens_owed0: info.tokensOwed0,
            tokens_owed1: info.tokensOwed1,
            fee_growth_inside0_last_x128: info.feeGrowthInside0LastX128,
            fee_growth_inside1_last_x128: info.feeGrowthInside1LastX128,
        }
    }
}

// ============================================================================
// Domain -> ABI (used to build chain fixtures)
// ============================================================================

impl TryFrom<&RawPool> for IPoolManager::PoolInfo {
    type Error = CoreError;

    fn try_from(raw: &RawPool) -> CoreResult<Self> {
        Ok(IPoolManager::PoolInfo {
            pool: raw.pool,
            token0: raw.token0,
            token1: raw.token1,
            index: raw.index,
            fee: u32_to_u24(raw.fee)?,
            feeProtocol: raw.fee_protocol,
            tickLower: i32_to_i24(raw.tick_lower)?,
            tickUpper: i32_to_i24(raw.tick_upper)?,
            tick: i32_to_i24(raw.tick)?,
            sqrtPriceX96: u256_to_u160(raw.sqrt_price_x96)?,
            liquidity: raw.liquidity,
        })
    }
}

impl TryFrom<&RawPosition> for IPositionManager::PositionInfo {
    type Error = CoreError;

    fn try_from(raw: &RawPosition) -> CoreResult<Self> {
        Ok(IPositionManager::PositionInfo {
            id: raw.id,
            owner: raw.owner,
            token0: raw.token0,
            token1: raw.token1,
            index: raw.index,
            fee: u32_to_u24(raw.fee)?,
            liquidity: raw.liquidity,
            tickLower: i32_to_i24(raw.tick_lower)?,
            tickUpper: i32_to_i24(raw.tick_upper)?,
            tokensOwed0: raw.tokens_owed0,
            tokensOwed1: raw.tokens_owed1,
            feeGrowthInside0LastX128: raw.fee_growth_inside0_last_x128,
            feeGrowthInside1LastX128: raw.fee_growth_inside1_last_x128,
        })
    }
}
