//! Position listing formatter

use alloy_primitives::{Address, U256};

use crate::constants::LIQUIDITY_DECIMALS;
use crate::math::{format_amount, tick_range_to_prices};
use crate::types::{format_fee_short, PositionDescriptor, RangeStatus, RawPosition, TokenMeta};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormattedPosition {
    pub id: U256,
    pub index: u32,
    pub token0: TokenMeta,
    pub token1: TokenMeta,
    pub pair_label: String,
    pub fee_label: String,
    pub liquidity: String,
    pub tokens_owed0: String,
    pub tokens_owed1: String,
    pub price_range: String,
    pub status: RangeStatus,
    pub can_collect: bool,
}

/// Totals shown above the position list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionSummary {
    pub total: usize,
    pub in_range: usize,
    pub with_fees: usize,
}

/// Positions of `owner` that still hold liquidity or owed tokens
pub fn open_positions_for(owner: &Address, positions: &[RawPosition]) -> Vec<PositionDescriptor> {
    positions
        .iter()
        .filter(|raw| raw.owner == *owner)
        .map(PositionDescriptor::from)
        .filter(|p| !p.is_closed())
        .collect()
}

/// In range when the pool's tick lies in `[lower, upper)`. Without a pool
/// tick, a position counts as in range while it holds liquidity.
pub fn range_status(position: &PositionDescriptor, pool_tick: Option<i32>) -> RangeStatus {
    let in_range = match pool_tick {
        Some(tick) => tick >= position.tick_lower && tick < position.tick_upper,
        None => position.liquidity > 0,
    };
    if in_range {
        RangeStatus::InRange
    } else {
        RangeStatus::OutOfRange
    }
}

pub fn format_position(
    position: &PositionDescriptor,
    token0: &TokenMeta,
    token1: &TokenMeta,
    pool_tick: Option<i32>,
) -> FormattedPosition {
    let (lower, upper) = tick_range_to_prices(
        position.tick_lower,
        position.tick_upper,
        token0.decimals,
        token1.decimals,
    );

    FormattedPosition {
        id: position.id,
        index: position.pool.index,
        token0: token0.clone(),
        token1: token1.clone(),
        pair_label: format!("{}/{}", token0.display_name(), token1.display_name()),
        fee_label: format_fee_short(position.fee),
        liquidity: format_amount(U256::from(position.liquidity), LIQUIDITY_DECIMALS),
        tokens_owed0: format_amount(U256::from(position.tokens_owed0), token0.decimals),
        tokens_owed1: format_amount(U256::from(position.tokens_owed1), token1.decimals),
        price_range: format!("{lower:.4} - {upper:.4}"),
        status: range_status(position, pool_tick),
        can_collect: position.has_fees_to_collect(),
    }
}

pub fn summarize(positions: &[FormattedPosition]) -> PositionSummary {
    PositionSummary {
        total: positions.len(),
        in_range: positions
            .iter()
            .filter(|p| p.status == RangeStatus::InRange)
            .count(),
        with_fees: positions.iter().filter(|p| p.can_collect).count(),
    }
}
