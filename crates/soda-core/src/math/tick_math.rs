//! # Tick Math
//!
//! Tick clamping, tick -> sqrt-price via `uniswap_v3_math`, and tick -> display
//! price. Display prices are floating point; they only feed formatting.

use alloy_primitives::U256;

use crate::constants::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use crate::errors::{CoreError, CoreResult};

/// Coerce a tick into the protocol domain `[MIN_TICK, MAX_TICK]`
pub fn clamp_tick(tick: i32) -> i32 {
    tick.clamp(MIN_TICK, MAX_TICK)
}

/// sqrt(1.0001^tick) * 2^96, exactly as the pool contracts compute it
pub fn get_sqrt_ratio_at_tick(tick: i32) -> CoreResult<U256> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(CoreError::TickOutOfRange(tick));
    }
    let ratio = uniswap_v3_math::tick_math::get_sqrt_ratio_at_tick(tick)
        .map_err(|e| CoreError::Math(e.to_string()))?;
    Ok(U256::from_limbs(*ratio.as_limbs()))
}

/// Price of token0 denominated in token1 at `tick`, adjusted for decimals.
/// The tick is clamped first.
pub fn tick_to_price(tick: i32, decimals0: u8, decimals1: u8) -> f64 {
    let tick = clamp_tick(tick);
    let scale = i32::from(decimals0) - i32::from(decimals1);
    1.0001f64.powi(tick) * 10f64.powi(scale)
}

/// Prices at both ends of a tick range, lower first
pub fn tick_range_to_prices(
    tick_lower: i32,
    tick_upper: i32,
    decimals0: u8,
    decimals1: u8,
) -> (f64, f64) {
    (
        tick_to_price(tick_lower, decimals0, decimals1),
        tick_to_price(tick_upper, decimals0, decimals1),
    )
}

/// Whether a swap from `token_in` to `token_out` moves the price down
pub fn is_zero_for_one(token_in_key: &str, token_out_key: &str) -> bool {
    token_in_key < token_out_key
}

/// Most permissive sqrt-price limit for a swap direction
pub fn sqrt_price_limit(zero_for_one: bool) -> U256 {
    if zero_for_one {
        MIN_SQRT_RATIO + U256::from(1u8)
    } else {
        MAX_SQRT_RATIO - U256::from(1u8)
    }
}
