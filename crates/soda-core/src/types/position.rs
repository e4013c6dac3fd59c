//! Liquidity position types

use alloy_primitives::{Address, U256};

use super::token::TokenPair;

/// Position tuple as returned by `PositionManager.getAllPositions`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawPosition {
    pub id: U256,
    pub owner: Address,
    pub token0: Address,
    pub token1: Address,
    pub index: u32,
    pub fee: u32,
    pub liquidity: u128,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub tokens_owed0: u128,
    pub tokens_owed1: u128,
    pub fee_growth_inside0_last_x128: U256,
    pub fee_growth_inside1_last_x128: U256,
}

/// Reference to the pool a position lives in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolRef {
    pub pair: TokenPair,
    pub index: u32,
}

/// A position owned by the connected account
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionDescriptor {
    pub id: U256,
    pub owner: Address,
    pub pool: PoolRef,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub tokens_owed0: u128,
    pub tokens_owed1: u128,
}

impl PositionDescriptor {
    /// Liquidity and both owed amounts are zero; nothing left to collect or burn
    pub fn is_closed(&self) -> bool {
        self.liquidity == 0 && self.tokens_owed0 == 0 && self.tokens_owed1 == 0
    }

    pub fn has_fees_to_collect(&self) -> bool {
        self.tokens_owed0 > 0 || self.tokens_owed1 > 0
    }
}

impl From<&RawPosition> for PositionDescriptor {
    fn from(raw: &RawPosition) -> Self {
        Self {
            id: raw.id,
            owner: raw.owner,
            pool: PoolRef {
                pair: TokenPair {
                    token0: raw.token0,
                    token1: raw.token1,
                },
                index: raw.index,
            },
            fee: raw.fee,
            tick_lower: raw.tick_lower,
            tick_upper: raw.tick_upper,
            liquidity: raw.liquidity,
            tokens_owed0: raw.tokens_owed0,
            tokens_owed1: raw.tokens_owed1,
        }
    }
}

/// Whether the pool's current price sits inside a position's range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RangeStatus {
    InRange,
    OutOfRange,
}

impl RangeStatus {
    pub fn label(self) -> &'static str {
        match self {
            RangeStatus::InRange => "in-range",
            RangeStatus::OutOfRange => "out-of-range",
        }
    }
}
