//! Pool listing formatter

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use super::numbers::{format_big_number, BigNumberFormat};
use crate::math::{amount_to_f64, tick_to_price};
use crate::types::{format_fee_percent, FeeTier, RawPool, TokenMeta};

/// A pool ready for display
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormattedPool {
    pub pool: Address,
    pub index: u32,
    pub token0: TokenMeta,
    pub token1: TokenMeta,
    /// `SYM0/SYM1`
    pub pair_label: String,
    pub fee: FeeTier,
    /// `0.30%`
    pub fee_label: String,
    pub tick: i32,
    /// token0 priced in token1, 6 decimals
    pub current_price: String,
    /// `lower - upper`, compacted
    pub price_range: String,
    /// Liquidity read as a token0 amount, compacted
    pub liquidity: String,
    pub liquidity_raw: u128,
    pub sqrt_price_x96: U256,
}

fn round6(value: f64) -> f64 {
    format!("{value:.6}").parse().unwrap_or(0.0)
}

/// Format one pool; `None` when its fee is not a supported tier
pub fn format_pool(raw: &RawPool, token0: &TokenMeta, token1: &TokenMeta) -> Option<FormattedPool> {
    let fee = FeeTier::from_fee(raw.fee)?;
    let (d0, d1) = (token0.decimals, token1.decimals);

    let current_price = format!("{:.6}", tick_to_price(raw.tick, d0, d1));

    let compact = BigNumberFormat::default();
    let lower = format_big_number(round6(tick_to_price(raw.tick_lower, d0, d1)), compact);
    let upper = format_big_number(round6(tick_to_price(raw.tick_upper, d0, d1)), compact);

    let liquidity = amount_to_f64(U256::from(raw.liquidity), d0);

    Some(FormattedPool {
        pool: raw.pool,
        index: raw.index,
        token0: token0.clone(),
        token1: token1.clone(),
        pair_label: format!("{}/{}", token0.display_name(), token1.display_name()),
        fee,
        fee_label: format_fee_percent(raw.fee),
        tick: raw.tick,
        current_price,
        price_range: format!("{lower} - {upper}"),
        liquidity: format_big_number(round6(liquidity), compact),
        liquidity_raw: raw.liquidity,
        sqrt_price_x96: raw.sqrt_price_x96,
    })
}

/// Format every pool whose tokens have known metadata and whose fee is supported
pub fn format_pool_list(pools: &[RawPool], tokens: &HashMap<Address, TokenMeta>) -> Vec<FormattedPool> {
    pools
        .iter()
        .filter_map(|raw| {
            let token0 = tokens.get(&raw.token0)?;
            let token1 = tokens.get(&raw.token1)?;
            format_pool(raw, token0, token1)
        })
        .collect()
}

/// Formatted pools trading exactly `token0`/`token1`
pub fn pool_options(pools: &[FormattedPool], token0: &Address, token1: &Address) -> Vec<FormattedPool> {
    pools
        .iter()
        .filter(|p| p.token0.address == *token0 && p.token1.address == *token1)
        .cloned()
        .collect()
}
