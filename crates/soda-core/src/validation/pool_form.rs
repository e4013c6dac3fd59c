//! Create-pool form

use alloy_primitives::Address;

use super::{parse_address, parse_int_field, Field, ValidationErrors};
use crate::constants::{MAX_TICK, MAX_USABLE_TICK, MIN_TICK, MIN_USABLE_TICK};
use crate::math::get_sqrt_ratio_at_tick;
use crate::types::{sorts_before, CreatePoolParams, FeeTier, TokenPair};

/// Raw text input of the create-pool form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreatePoolForm {
    pub token0: String,
    pub token1: String,
    pub fee: String,
    pub tick_lower: String,
    pub tick_upper: String,
    pub init_tick: String,
}

fn check_token(errors: &mut ValidationErrors, field: Field, input: &str) -> Option<Address> {
    if input.trim().is_empty() {
        errors.push(field, format!("{field} is required"));
        return None;
    }
    match parse_address(input) {
        Ok(address) => Some(address),
        Err(message) => {
            errors.push(field, message);
            None
        }
    }
}

fn check_fee(errors: &mut ValidationErrors, input: &str) -> Option<FeeTier> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        errors.push(Field::Fee, "fee tier is required");
        return None;
    }
    match trimmed.parse::<u32>().ok().and_then(FeeTier::from_fee) {
        Some(tier) => Some(tier),
        None => {
            errors.push(Field::Fee, format!("unsupported fee tier: {trimmed}"));
            None
        }
    }
}

fn check_tick(errors: &mut ValidationErrors, field: Field, input: &str) -> Option<i32> {
    let value = parse_int_field(errors, field, input)?;
    match i32::try_from(value) {
        Ok(tick) => Some(tick),
        Err(_) => {
            errors.push(field, format!("{field} is out of range"));
            None
        }
    }
}

/// Addresses the form accepted syntactically, for the async contract checks
pub fn form_addresses(form: &CreatePoolForm) -> (Option<Address>, Option<Address>) {
    (parse_address(&form.token0).ok(), parse_address(&form.token1).ok())
}

/// Validate the form and derive the `createAndInitializePoolIfNecessary` params.
///
/// Tick rules, each reported on the field named:
/// - `tickLower`: `lower < MIN_USABLE_TICK || upper >= MAX_USABLE_TICK`
/// - `tickUpper`: `upper <= MIN_USABLE_TICK || upper > MAX_USABLE_TICK`
/// - `tickUpper`: `upper <= lower`
/// - each bound must be a multiple of the fee tier's spacing
pub fn validate_pool_form(form: &CreatePoolForm) -> Result<CreatePoolParams, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let token0 = check_token(&mut errors, Field::Token0, &form.token0);
    let token1 = check_token(&mut errors, Field::Token1, &form.token1);
    if let (Some(a), Some(b)) = (token0, token1) {
        if a == b {
            errors.push(Field::Token1, "token0 and token1 must be different");
        } else if !sorts_before(&a, &b) {
            errors.push(Field::Token1, "token0 address must be lower than token1");
        }
    }

    let fee = check_fee(&mut errors, &form.fee);
    let lower = check_tick(&mut errors, Field::TickLower, &form.tick_lower);
    let upper = check_tick(&mut errors, Field::TickUpper, &form.tick_upper);

    if let (Some(lower), Some(upper)) = (lower, upper) {
        if lower < MIN_USABLE_TICK || upper >= MAX_USABLE_TICK {
            errors.push(
                Field::TickLower,
                format!("tick range must lie within [{MIN_USABLE_TICK}, {MAX_USABLE_TICK})"),
            );
        }
        if upper <= MIN_USABLE_TICK || upper > MAX_USABLE_TICK {
            errors.push(
                Field::TickUpper,
                format!("tickUpper must lie within ({MIN_USABLE_TICK}, {MAX_USABLE_TICK}]"),
            );
        }
        if upper <= lower {
            errors.push(Field::TickUpper, "tickUpper must be greater than tickLower");
        }
    }

    if let Some(fee) = fee {
        let spacing = fee.tick_spacing();
        if let Some(lower) = lower.filter(|t| !fee.is_aligned(*t)) {
            errors.push(
                Field::TickLower,
                format!("tickLower {lower} must be a multiple of {spacing}"),
            );
        }
        if let Some(upper) = upper.filter(|t| !fee.is_aligned(*t)) {
            errors.push(
                Field::TickUpper,
                format!("tickUpper {upper} must be a multiple of {spacing}"),
            );
        }
    }

    let init_tick = check_tick(&mut errors, Field::InitTick, &form.init_tick);
    if let Some(tick) = init_tick {
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            errors.push(
                Field::InitTick,
                format!("initTick must lie within [{MIN_TICK}, {MAX_TICK}]"),
            );
        }
    }

    let (Some(token0), Some(token1), Some(fee), Some(lower), Some(upper), Some(init_tick)) =
        (token0, token1, fee, lower, upper, init_tick)
    else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    let sqrt_price_x96 = match get_sqrt_ratio_at_tick(init_tick) {
        Ok(ratio) => ratio,
        Err(e) => {
            errors.push(Field::InitTick, e.to_string());
            return Err(errors);
        }
    };

    Ok(CreatePoolParams {
        pair: TokenPair { token0, token1 },
        fee,
        tick_lower: lower,
        tick_upper: upper,
        sqrt_price_x96,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    const T0: &str = "0x1000000000000000000000000000000000000001";
    const T1: &str = "0x2000000000000000000000000000000000000002";

    fn form(fee: &str, lower: &str, upper: &str) -> CreatePoolForm {
        CreatePoolForm {
            token0: T0.into(),
            token1: T1.into(),
            fee: fee.into(),
            tick_lower: lower.into(),
            tick_upper: upper.into(),
            init_tick: "0".into(),
        }
    }

    #[test]
    fn test_valid_form_derives_params() {
        let params = validate_pool_form(&form("3000", "-600", "600")).unwrap();
        assert_eq!(params.fee, FeeTier::Medium);
        assert_eq!(params.tick_lower, -600);
        assert_eq!(params.sqrt_price_x96, U256::from(1u8) << 96);
    }

    #[test]
    fn test_misaligned_ticks_rejected_per_tier() {
        for (fee, spacing) in [("500", 10), ("3000", 60), ("10000", 200)] {
            let lower = format!("{}", -spacing * 3 + 1);
            let upper = format!("{}", spacing * 3 - 1);
            let errors = validate_pool_form(&form(fee, &lower, &upper)).unwrap_err();
            assert!(errors.has(Field::TickLower), "fee {fee}");
            assert!(errors.has(Field::TickUpper), "fee {fee}");
        }
    }

    #[test]
    fn test_token_ordering() {
        let mut swapped = form("500", "-10", "10");
        std::mem::swap(&mut swapped.token0, &mut swapped.token1);
        let errors = validate_pool_form(&swapped).unwrap_err();
        assert!(errors.has(Field::Token1));
        assert!(!errors.has(Field::Token0));

        let mut same = form("500", "-10", "10");
        same.token1 = T0.to_uppercase().replacen("0X", "0x", 1);
        let errors = validate_pool_form(&same).unwrap_err();
        assert_eq!(errors.messages(Field::Token1), vec!["token0 and token1 must be different"]);
    }

    #[test]
    fn test_full_usable_range_rejected() {
        let errors = validate_pool_form(&form("3000", "-887220", "887220")).unwrap_err();
        assert!(errors.has(Field::TickLower));
        assert!(!errors.has(Field::TickUpper));
    }

    #[test]
    fn test_upper_must_exceed_lower() {
        let errors = validate_pool_form(&form("3000", "600", "600")).unwrap_err();
        assert_eq!(
            errors.messages(Field::TickUpper),
            vec!["tickUpper must be greater than tickLower"]
        );
    }

    #[test]
    fn test_fee_rules() {
        let errors = validate_pool_form(&form("", "-60", "60")).unwrap_err();
        assert_eq!(errors.messages(Field::Fee), vec!["fee tier is required"]);
        let errors = validate_pool_form(&form("2500", "-61", "60")).unwrap_err();
        assert!(errors.has(Field::Fee));
        // alignment is not checked without a valid tier
        assert!(!errors.has(Field::TickLower));
    }

    #[test]
    fn test_missing_and_non_numeric_ticks() {
        let errors = validate_pool_form(&form("3000", "", "abc")).unwrap_err();
        assert_eq!(errors.messages(Field::TickLower), vec!["tickLower is required"]);
        assert_eq!(errors.messages(Field::TickUpper), vec!["tickUpper must be an integer"]);
    }

    #[test]
    fn test_init_tick_domain() {
        let mut input = form("3000", "-60", "60");
        input.init_tick = "900000".into();
        let errors = validate_pool_form(&input).unwrap_err();
        assert!(errors.has(Field::InitTick));
    }
}
