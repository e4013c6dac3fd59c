//! # Domain Types
//!
//! Pools, positions, tokens and transaction tracking.

pub mod fee;
pub mod pool;
pub mod position;
pub mod token;
pub mod transaction;

pub use fee::*;
pub use pool::*;
pub use position::*;
pub use token::*;
pub use transaction::*;
