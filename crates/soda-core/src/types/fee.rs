//! Fee tiers and their tick spacing

use std::fmt;

use crate::constants::FEE_DENOMINATOR;
use crate::errors::{CoreError, CoreResult};

/// Fee tier in hundredths of a basis point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub enum FeeTier {
    /// 0.05%, stable pairs
    Low,
    /// 0.30%, most pairs
    Medium,
    /// 1.00%, exotic pairs
    High,
}

impl FeeTier {
    pub const ALL: [FeeTier; 3] = [FeeTier::Low, FeeTier::Medium, FeeTier::High];

    /// Raw fee value as stored on chain
    pub const fn fee(self) -> u32 {
        match self {
            FeeTier::Low => 500,
            FeeTier::Medium => 3_000,
            FeeTier::High => 10_000,
        }
    }

    /// Tick spacing the pool contracts enforce for this tier
    pub const fn tick_spacing(self) -> i32 {
        match self {
            FeeTier::Low => 10,
            FeeTier::Medium => 60,
            FeeTier::High => 200,
        }
    }

    /// Look up a tier from its raw fee, `None` for unsupported values
    pub const fn from_fee(fee: u32) -> Option<Self> {
        match fee {
            500 => Some(FeeTier::Low),
            3_000 => Some(FeeTier::Medium),
            10_000 => Some(FeeTier::High),
            _ => None,
        }
    }

    /// Fee as a two-decimal percentage, e.g. `0.30%`
    pub fn percent_label(self) -> String {
        format_fee_percent(self.fee())
    }

    /// Label shown in fee pickers
    pub fn description(self) -> &'static str {
        match self {
            FeeTier::Low => "0.05% - stable pairs",
            FeeTier::Medium => "0.30% - standard",
            FeeTier::High => "1.00% - high risk",
        }
    }

    /// Whether `tick` sits on this tier's spacing grid
    pub fn is_aligned(self, tick: i32) -> bool {
        tick % self.tick_spacing() == 0
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = CoreError;

    fn try_from(fee: u32) -> CoreResult<Self> {
        FeeTier::from_fee(fee).ok_or(CoreError::UnsupportedFee(fee))
    }
}

impl From<FeeTier> for u32 {
    fn from(tier: FeeTier) -> u32 {
        tier.fee()
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.percent_label())
    }
}

/// Render any raw fee as `fee / 1e6` in percent with two decimals
pub fn format_fee_percent(fee: u32) -> String {
    let percent = f64::from(fee) * 100.0 / f64::from(FEE_DENOMINATOR);
    format!("{percent:.2}%")
}

/// Short fee label used by position listings, e.g. `0.3%`
pub fn format_fee_short(fee: u32) -> String {
    let percent = f64::from(fee) / 10_000.0;
    format!("{percent}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_spacing_per_tier() {
        assert_eq!(FeeTier::Low.tick_spacing(), 10);
        assert_eq!(FeeTier::Medium.tick_spacing(), 60);
        assert_eq!(FeeTier::High.tick_spacing(), 200);
    }

    #[test]
    fn test_unsupported_fee_rejected() {
        assert_eq!(FeeTier::try_from(100), Err(CoreError::UnsupportedFee(100)));
        assert_eq!(FeeTier::try_from(3_000), Ok(FeeTier::Medium));
    }

    #[test]
    fn test_fee_labels() {
        assert_eq!(FeeTier::Low.percent_label(), "0.05%");
        assert_eq!(FeeTier::Medium.percent_label(), "0.30%");
        assert_eq!(FeeTier::High.percent_label(), "1.00%");
        assert_eq!(format_fee_short(3_000), "0.3%");
        assert_eq!(format_fee_short(10_000), "1%");
    }

    #[test]
    fn test_alignment_handles_negative_ticks() {
        assert!(FeeTier::Medium.is_aligned(-120));
        assert!(!FeeTier::Medium.is_aligned(-90));
        assert!(FeeTier::High.is_aligned(0));
    }
}
