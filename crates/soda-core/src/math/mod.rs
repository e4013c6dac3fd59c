//! # Math
//!
//! Thin layer over `uniswap_v3_math` and `alloy_primitives::utils`.

pub mod tick_math;
pub mod units;

pub use tick_math::*;
pub use units::*;
