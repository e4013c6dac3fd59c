//! # Core Error Types
//!
//! Errors raised by the pure domain layer. Form validation reports
//! field-scoped problems through [`crate::validation::ValidationErrors`]
//! instead; these variants cover programmatic misuse and math domain issues.

use thiserror::Error;

/// Core errors shared by every consumer of the domain layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    // ========================================================================
    // Fee / Tick Errors
    // ========================================================================
    #[error("Unsupported fee tier: {0}")]
    UnsupportedFee(u32),

    #[error("Tick {0} out of range")]
    TickOutOfRange(i32),

    #[error("Tick {tick} is not a multiple of spacing {spacing}")]
    MisalignedTick { tick: i32, spacing: i32 },

    #[error("Invalid tick range: lower {lower} must be below upper {upper}")]
    InvalidTickRange { lower: i32, upper: i32 },

    // ========================================================================
    // Input Errors
    // ========================================================================
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid slippage: {0}")]
    InvalidSlippage(String),

    #[error("Unsorted token pair")]
    UnsortedTokens,

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    #[error("Invalid transition from {from} on {event}")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },

    #[error("Math error: {0}")]
    Math(String),
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
