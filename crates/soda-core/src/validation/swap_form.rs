//! Swap form

use alloy_primitives::Address;

use super::{parse_address, Field, ValidationErrors};
use crate::constants::DEFAULT_SLIPPAGE_PERCENT;
use crate::math::slippage_to_bps;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SwapForm {
    pub sell_token: String,
    pub buy_token: String,
    pub sell_amount: String,
    /// Percent, empty means the default
    pub slippage: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapFormValues {
    pub sell_token: Address,
    pub buy_token: Address,
    pub sell_amount: String,
    pub slippage_bps: u64,
}

fn check_token(errors: &mut ValidationErrors, field: Field, input: &str) -> Option<Address> {
    if input.trim().is_empty() {
        errors.push(field, "select a token");
        return None;
    }
    parse_address(input)
        .map_err(|message| errors.push(field, message))
        .ok()
}

/// Checks that need no chain access; route and balance checks come later
pub fn validate_swap_form(form: &SwapForm) -> Result<SwapFormValues, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let sell = check_token(&mut errors, Field::SellToken, &form.sell_token);
    let buy = check_token(&mut errors, Field::BuyToken, &form.buy_token);
    if let (Some(sell), Some(buy)) = (sell, buy) {
        if sell == buy {
            errors.push(Field::BuyToken, "cannot swap a token for itself");
        }
    }

    let amount = form.sell_amount.trim();
    match amount.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => {}
        Ok(_) => errors.push(Field::SellAmount, "enter an amount greater than zero"),
        Err(_) => errors.push(Field::SellAmount, "enter a valid amount"),
    }

    let slippage_input = form.slippage.trim();
    let slippage = if slippage_input.is_empty() {
        Ok(DEFAULT_SLIPPAGE_PERCENT)
    } else {
        slippage_input.parse::<f64>()
    };
    let slippage_bps = match slippage.ok().map(slippage_to_bps) {
        Some(Ok(bps)) => Some(bps),
        _ => {
            errors.push(Field::Slippage, "slippage must be between 0 and 100 percent");
            None
        }
    };

    match (sell, buy, slippage_bps) {
        (Some(sell_token), Some(buy_token), Some(slippage_bps)) if errors.is_empty() => {
            Ok(SwapFormValues {
                sell_token,
                buy_token,
                sell_amount: amount.to_string(),
                slippage_bps,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(amount: &str, slippage: &str) -> SwapForm {
        SwapForm {
            sell_token: "0x1000000000000000000000000000000000000001".into(),
            buy_token: "0x2000000000000000000000000000000000000002".into(),
            sell_amount: amount.into(),
            slippage: slippage.into(),
        }
    }

    #[test]
    fn test_default_slippage() {
        let values = validate_swap_form(&form("1", "")).unwrap();
        assert_eq!(values.slippage_bps, 50);
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(validate_swap_form(&form("0", "1")).unwrap_err().has(Field::SellAmount));
        assert!(validate_swap_form(&form("x", "1")).unwrap_err().has(Field::SellAmount));
    }

    #[test]
    fn test_slippage_bounds() {
        assert!(validate_swap_form(&form("1", "100")).unwrap_err().has(Field::Slippage));
        assert_eq!(validate_swap_form(&form("1", "1.25")).unwrap().slippage_bps, 125);
    }

    #[test]
    fn test_same_token_rejected() {
        let mut input = form("1", "");
        input.buy_token = input.sell_token.clone();
        assert!(validate_swap_form(&input).unwrap_err().has(Field::BuyToken));
    }
}
