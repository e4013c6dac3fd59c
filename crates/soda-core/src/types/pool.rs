//! Pool types: raw on-chain tuples and the validated descriptor

use alloy_primitives::{Address, U256};

use super::fee::FeeTier;
use super::token::{sorts_before, TokenPair};
use crate::constants::{MAX_TICK, MIN_TICK};
use crate::errors::{CoreError, CoreResult};

/// Pool tuple as returned by `PoolManager.getAllPools`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawPool {
    pub pool: Address,
    pub token0: Address,
    pub token1: Address,
    pub index: u32,
    pub fee: u32,
    pub fee_protocol: u8,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub tick: i32,
    pub sqrt_price_x96: U256,
    pub liquidity: u128,
}

impl RawPool {
    /// A pool can route swaps once it is initialized and holds liquidity
    pub fn is_available(&self) -> bool {
        !self.sqrt_price_x96.is_zero() && self.liquidity > 0
    }

    /// Whether the pool trades `a` against `b` in either orientation
    pub fn joins(&self, a: &Address, b: &Address) -> bool {
        (self.token0 == *a && self.token1 == *b) || (self.token0 == *b && self.token1 == *a)
    }
}

/// A pool whose fee tier is supported and whose tokens are sorted
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolDescriptor {
    pub pool: Address,
    pub pair: TokenPair,
    pub index: u32,
    pub fee: FeeTier,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub tick: i32,
    pub sqrt_price_x96: U256,
    pub liquidity: u128,
}

impl PoolDescriptor {
    pub fn tick_spacing(&self) -> i32 {
        self.fee.tick_spacing()
    }

    /// Whether `tick` lies in `[tick_lower, tick_upper)`
    pub fn contains_tick(&self, tick: i32) -> bool {
        tick >= self.tick_lower && tick < self.tick_upper
    }
}

impl TryFrom<&RawPool> for PoolDescriptor {
    type Error = CoreError;

    fn try_from(raw: &RawPool) -> CoreResult<Self> {
        let fee = FeeTier::try_from(raw.fee)?;
        if !sorts_before(&raw.token0, &raw.token1) {
            return Err(CoreError::UnsortedTokens);
        }
        if raw.tick_lower >= raw.tick_upper {
            return Err(CoreError::InvalidTickRange {
                lower: raw.tick_lower,
                upper: raw.tick_upper,
            });
        }
        for tick in [raw.tick_lower, raw.tick_upper] {
            if !(MIN_TICK..=MAX_TICK).contains(&tick) {
                return Err(CoreError::TickOutOfRange(tick));
            }
        }
        Ok(Self {
            pool: raw.pool,
            pair: TokenPair {
                token0: raw.token0,
                token1: raw.token1,
            },
            index: raw.index,
            fee,
            tick_lower: raw.tick_lower,
            tick_upper: raw.tick_upper,
            tick: raw.tick,
            sqrt_price_x96: raw.sqrt_price_x96,
            liquidity: raw.liquidity,
        })
    }
}

/// Parameters of `PoolManager.createAndInitializePoolIfNecessary`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatePoolParams {
    pub pair: TokenPair,
    pub fee: FeeTier,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub sqrt_price_x96: U256,
}
