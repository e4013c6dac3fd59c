//! # Soda Core - Shared DEX Client Logic
//!
//! Pure, I/O-free building blocks for the Soda concentrated-liquidity DEX
//! client:
//!
//! - Domain types for pools, positions, tokens and pending transactions
//! - Protocol constants (tick domain, sqrt-price limits, fee tiers)
//! - Tick/price conversion on top of `uniswap_v3_math`
//! - Number formatting used by pool and position listings
//! - Synchronous, field-scoped validation of the create-pool,
//!   create-position and swap forms
//!
//! Anything that needs the network (ERC20 probing, quoting, sending
//! transactions) lives in `soda-sdk`.
//!
//! ## Feature Flags
//!
//! - `serde` (default): serde derives on domain types

pub mod constants;
pub mod errors;
pub mod format;
pub mod math;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use constants::*;
pub use errors::{CoreError, CoreResult};
pub use types::*;
