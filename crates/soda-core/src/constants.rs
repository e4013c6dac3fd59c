//! # Protocol Constants
//!
//! - Tick domain of the pool contracts and the narrower bounds accepted by forms
//! - Sqrt-price limits used for swap simulation
//! - Fee tiers and their tick spacing
//! - Well-known token addresses
//! - Client defaults (slippage, deadline, polling)

use alloy_primitives::{address, Address, U256};

// ============================================================================
// Tick Domain
// ============================================================================

/// Minimum tick supported by the pool contracts
pub const MIN_TICK: i32 = -887_272;

/// Maximum tick supported by the pool contracts
pub const MAX_TICK: i32 = 887_272;

/// Lowest tick accepted by the create-pool form.
/// Divisible by every supported tick spacing.
pub const MIN_USABLE_TICK: i32 = -887_220;

/// Highest tick accepted by the create-pool form
pub const MAX_USABLE_TICK: i32 = 887_220;

// ============================================================================
// Sqrt Price Limits (Q64.96)
// ============================================================================

/// sqrt(1.0001^MIN_TICK) * 2^96
pub const MIN_SQRT_RATIO: U256 = U256::from_limbs([4_295_128_739, 0, 0, 0]);

/// sqrt(1.0001^MAX_TICK) * 2^96
pub const MAX_SQRT_RATIO: U256 = U256::from_limbs([
    0x5d95_1d52_6398_8d26,
    0xefd1_fc6a_5064_8849,
    0xfffd_8963,
    0,
]);

// ============================================================================
// Fees
// ============================================================================

/// Fee denominator: fees are expressed in hundredths of a basis point
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Supported fee tiers
pub const SUPPORTED_FEES: [u32; 3] = [500, 3_000, 10_000];

/// Basis points denominator (10,000 = 100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

// ============================================================================
// Tokens
// ============================================================================

/// Placeholder address wallets and token lists use for the chain's native coin
pub const NATIVE_TOKEN_PLACEHOLDER: Address =
    address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// Wrapped ether on Sepolia
pub const SEPOLIA_WETH: Address = address!("fFf9976782d46CC05630D1f6eBAb18b2324d6B14");

/// Decimals assumed when a token does not answer `decimals()`
pub const FALLBACK_DECIMALS: u8 = 18;

/// Symbol shown when a token does not answer `symbol()`
pub const FALLBACK_SYMBOL: &str = "Unknown";

// ============================================================================
// Client Defaults
// ============================================================================

/// Default slippage tolerance in percent
pub const DEFAULT_SLIPPAGE_PERCENT: f64 = 0.5;

/// Default transaction deadline in minutes
pub const DEFAULT_DEADLINE_MINUTES: u64 = 20;

/// Longest accepted transaction deadline in minutes (one week)
pub const MAX_DEADLINE_MINUTES: u64 = 7 * 24 * 60;

/// Pool list refresh interval in seconds
pub const POOLS_REFRESH_SECS: u64 = 15;

/// Position list refresh interval in seconds
pub const POSITIONS_REFRESH_SECS: u64 = 20;

/// Decimals of position liquidity when rendered as a plain number
pub const LIQUIDITY_DECIMALS: u8 = 18;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_ratio_limits_match_tick_math() {
        assert_eq!(MIN_SQRT_RATIO.to_string(), "4295128739");
        assert_eq!(
            MAX_SQRT_RATIO.to_string(),
            "1461446703485210103287273052203988822378723970342"
        );
    }

    #[test]
    fn test_usable_ticks_align_to_every_spacing() {
        for spacing in [10, 60, 200] {
            assert_eq!(MIN_USABLE_TICK % spacing, 0);
            assert_eq!(MAX_USABLE_TICK % spacing, 0);
        }
        assert!(MIN_USABLE_TICK > MIN_TICK);
        assert!(MAX_USABLE_TICK < MAX_TICK);
    }
}
