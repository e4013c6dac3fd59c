//! Create-position form

use super::{parse_address, parse_amount_field, parse_int_field, Field, ValidationErrors};
use crate::types::TokenPair;

/// Raw text input of the create-position form.
/// The pair is picked from the pool list, so tokens arrive pre-sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreatePositionForm {
    pub token0: String,
    pub token1: String,
    pub index: String,
    pub amount0: String,
    pub amount1: String,
}

/// Accepted form values; amounts are decimal strings, empty normalized to `0`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionFormValues {
    pub pair: TokenPair,
    pub index: u32,
    pub amount0: String,
    pub amount1: String,
}

fn normalize_amount(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn validate_position_form(form: &CreatePositionForm) -> Result<PositionFormValues, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let pair = if form.token0.trim().is_empty() || form.token1.trim().is_empty() {
        errors.push(Field::Pair, "select a token pair");
        None
    } else {
        match (parse_address(&form.token0), parse_address(&form.token1)) {
            (Ok(a), Ok(b)) => match TokenPair::new(a, b) {
                Ok(pair) => Some(pair),
                Err(e) => {
                    errors.push(Field::Pair, e.to_string());
                    None
                }
            },
            (Err(message), _) | (_, Err(message)) => {
                errors.push(Field::Pair, message);
                None
            }
        }
    };

    let index = match parse_int_field(&mut errors, Field::Index, &form.index) {
        Some(value) => match u32::try_from(value) {
            Ok(index) => Some(index),
            Err(_) => {
                errors.push(Field::Index, "index must be a non-negative integer");
                None
            }
        },
        None => None,
    };

    let amount0 = parse_amount_field(&mut errors, Field::Amount0, &form.amount0);
    let amount1 = parse_amount_field(&mut errors, Field::Amount1, &form.amount1);
    if let (Some(a0), Some(a1)) = (amount0, amount1) {
        if a0 <= 0.0 && a1 <= 0.0 {
            errors.push(Field::Amount0, "enter an amount for at least one token");
            errors.push(Field::Amount1, "enter an amount for at least one token");
        }
    }

    match (pair, index) {
        (Some(pair), Some(index)) if errors.is_empty() => Ok(PositionFormValues {
            pair,
            index,
            amount0: normalize_amount(&form.amount0),
            amount1: normalize_amount(&form.amount1),
        }),
        _ => Err(errors),
    }
}
