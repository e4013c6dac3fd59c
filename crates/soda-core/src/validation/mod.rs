//! # Form Validation
//!
//! Synchronous, field-scoped checks for the create-pool, create-position and
//! swap forms. Every rule reports against the field the user has to fix;
//! nothing is coerced. Checks that need the chain (contract code, ERC20
//! surface, balances) are layered on top by `soda-sdk`.

pub mod address;
pub mod pool_form;
pub mod position_form;
pub mod swap_form;

use std::fmt;

pub use address::parse_address;
pub use pool_form::{validate_pool_form, CreatePoolForm};
pub use position_form::{validate_position_form, CreatePositionForm, PositionFormValues};
pub use swap_form::{validate_swap_form, SwapForm, SwapFormValues};

/// Form fields errors can be attached to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Token0,
    Token1,
    Fee,
    TickLower,
    TickUpper,
    InitTick,
    Pair,
    Index,
    Amount0,
    Amount1,
    SellToken,
    BuyToken,
    SellAmount,
    Slippage,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Token0 => "token0",
            Field::Token1 => "token1",
            Field::Fee => "fee",
            Field::TickLower => "tickLower",
            Field::TickUpper => "tickUpper",
            Field::InitTick => "initTick",
            Field::Pair => "pair",
            Field::Index => "index",
            Field::Amount0 => "amount0",
            Field::Amount1 => "amount1",
            Field::SellToken => "sellToken",
            Field::BuyToken => "buyToken",
            Field::SellAmount => "sellAmount",
            Field::Slippage => "slippage",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Ordered collection of field errors
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether `field` has at least one error
    pub fn has(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Messages attached to `field`, in order
    pub fn messages(&self, field: Field) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(value)` when no error was recorded
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Parse a required integer field
pub(crate) fn parse_int_field(errors: &mut ValidationErrors, field: Field, input: &str) -> Option<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        errors.push(field, format!("{field} is required"));
        return None;
    }
    match trimmed.parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(field, format!("{field} must be an integer"));
            None
        }
    }
}

/// Parse an optional non-negative decimal amount; empty counts as zero
pub(crate) fn parse_amount_field(
    errors: &mut ValidationErrors,
    field: Field,
    input: &str,
) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        Ok(_) => {
            errors.push(field, format!("{field} must be zero or greater"));
            None
        }
        Err(_) => {
            errors.push(field, format!("{field} must be a number"));
            None
        }
    }
}
