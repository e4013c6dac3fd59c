//! # Formatting
//!
//! Raw on-chain tuples + token metadata -> display strings.

pub mod numbers;
pub mod pool;
pub mod position;

pub use numbers::*;
pub use pool::{format_pool, format_pool_list, pool_options, FormattedPool};
pub use position::{
    format_position, open_positions_for, range_status, summarize, FormattedPosition,
    PositionSummary,
};
