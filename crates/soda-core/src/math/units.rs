//! Decimal <-> base-unit conversion and slippage arithmetic

use alloy_primitives::{
    utils::{format_units, parse_units},
    U256,
};

use crate::constants::BPS_DENOMINATOR;
use crate::errors::{CoreError, CoreResult};

/// Parse a user-entered decimal string into base units.
/// Negative values and more fractional digits than `decimals` are rejected.
pub fn parse_amount(amount: &str, decimals: u8) -> CoreResult<U256> {
    let trimmed = amount.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') {
        return Err(CoreError::InvalidAmount(amount.to_string()));
    }
    let parsed = parse_units(trimmed, decimals)
        .map_err(|e| CoreError::InvalidAmount(format!("{amount}: {e}")))?;
    Ok(parsed.into())
}

/// Render base units as a decimal string without trailing zeros
pub fn format_amount(amount: U256, decimals: u8) -> String {
    match format_units(amount, decimals) {
        Ok(formatted) => trim_decimal(&formatted),
        Err(_) => amount.to_string(),
    }
}

/// Base units as a float, for display math only
pub fn amount_to_f64(amount: U256, decimals: u8) -> f64 {
    format_amount(amount, decimals).parse().unwrap_or(0.0)
}

fn trim_decimal(value: &str) -> String {
    if !value.contains('.') {
        return value.to_string();
    }
    let trimmed = value.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Convert a slippage percent (e.g. `0.5`) into basis points
pub fn slippage_to_bps(percent: f64) -> CoreResult<u64> {
    if !percent.is_finite() || !(0.0..100.0).contains(&percent) {
        return Err(CoreError::InvalidSlippage(percent.to_string()));
    }
    Ok((percent * 100.0).floor() as u64)
}

/// `amount * (10000 - bps) / 10000`
pub fn apply_slippage(amount: U256, slippage_bps: u64) -> U256 {
    let keep = BPS_DENOMINATOR.saturating_sub(slippage_bps);
    amount * U256::from(keep) / U256::from(BPS_DENOMINATOR)
}
