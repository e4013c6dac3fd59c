//! Form orchestration
//!
//! Runs the synchronous checks from `soda_core::validation`, adds the checks
//! that need the chain, and derives call parameters. Errors stay scoped to
//! the field the user has to fix.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use soda_core::math::parse_amount;
use soda_core::validation::{
    pool_form::form_addresses, validate_pool_form, validate_position_form, validate_swap_form,
    CreatePoolForm, CreatePositionForm, Field, SwapForm, ValidationErrors,
};
use soda_core::{CreatePoolParams, TokenMeta};
use tracing::debug;

use super::pools::PoolService;
use super::positions::MintParams;
use super::swap::SwapParams;
use super::tokens::{TokenCheck, TokenService};
use crate::error::{SdkError, SdkResult};
use crate::quote::{Quote, QuoteFetcher, QuoteOutcome, QuoteRequest};
use crate::router::Route;

/// A validated swap, ready to sequence
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedSwap {
    pub params: SwapParams,
    pub route: Route,
    pub quote: Quote,
    pub token_in: TokenMeta,
    pub token_out: TokenMeta,
}

/// Unix seconds `minutes` from now, saturating at `u64::MAX`
pub fn deadline_in(minutes: u64) -> u64 {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    now.saturating_add(minutes.saturating_mul(60))
}

pub struct FormOrchestrator {
    tokens: Arc<TokenService>,
    pools: Arc<PoolService>,
    quotes: Arc<QuoteFetcher>,
    deadline_minutes: u64,
}

impl FormOrchestrator {
    pub fn new(
        tokens: Arc<TokenService>,
        pools: Arc<PoolService>,
        quotes: Arc<QuoteFetcher>,
        deadline_minutes: u64,
    ) -> Self {
        Self {
            tokens,
            pools,
            quotes,
            deadline_minutes,
        }
    }

    async fn check_token(&self, errors: &mut ValidationErrors, field: Field, token: Address) {
        match self.tokens.check_erc20(token).await {
            Ok(check) => {
                if let Some(message) = check.message() {
                    errors.push(field, message);
                }
            }
            Err(e) => {
                debug!("ERC20 probe of {} failed: {}", token, e);
                errors.push(field, format!("could not verify token: {e}"));
            }
        }
    }

    /// Create-pool form: field rules plus contract and ERC20 checks on both tokens
    pub async fn create_pool(&self, form: &CreatePoolForm) -> Result<CreatePoolParams, ValidationErrors> {
        let checked = validate_pool_form(form);

        let mut chain_errors = ValidationErrors::new();
        let (token0, token1) = form_addresses(form);
        if let Some(token0) = token0 {
            self.check_token(&mut chain_errors, Field::Token0, token0).await;
        }
        if let Some(token1) = token1.filter(|t| Some(*t) != token0) {
            self.check_token(&mut chain_errors, Field::Token1, token1).await;
        }

        match checked {
            Ok(params) => chain_errors.into_result(params),
            Err(mut errors) => {
                errors.extend(chain_errors);
                Err(errors)
            }
        }
    }

    /// Create-position form -> mint params for `recipient`
    pub async fn create_position(&self, form: &CreatePositionForm, recipient: Address) -> SdkResult<MintParams> {
        let values = validate_position_form(form)?;
        let pair = values.pair;
        let metas = self.tokens.metadata_batch(&[pair.token0, pair.token1]).await;
        let decimals = |token: Address| metas.get(&token).map(|m| m.decimals);

        let mut errors = ValidationErrors::new();
        let mut amount = |field: Field, input: &str, token: Address| -> U256 {
            let Some(decimals) = decimals(token) else {
                errors.push(field, "token decimals unavailable");
                return U256::ZERO;
            };
            parse_amount(input, decimals).unwrap_or_else(|e| {
                errors.push(field, e.to_string());
                U256::ZERO
            })
        };
        let amount0_desired = amount(Field::Amount0, &values.amount0, pair.token0);
        let amount1_desired = amount(Field::Amount1, &values.amount1, pair.token1);
        if !errors.is_empty() {
            return Err(errors.into());
        }
        // a positive float can still round to zero base units
        if amount0_desired.is_zero() && amount1_desired.is_zero() {
            errors.push(Field::Amount0, "amount is below the token's precision");
            errors.push(Field::Amount1, "amount is below the token's precision");
            return Err(errors.into());
        }

        Ok(MintParams {
            token0: pair.token0,
            token1: pair.token1,
            index: values.index,
            amount0_desired,
            amount1_desired,
            recipient,
            deadline: deadline_in(self.deadline_minutes),
        })
    }

    /// Swap form -> route, quote and `exactInput` params for `recipient`.
    /// Requires a route, a quote and enough balance. A quote overtaken by a
    /// newer swap preparation is reported as a sell amount error.
    pub async fn swap(&self, form: &SwapForm, recipient: Address) -> SdkResult<PreparedSwap> {
        let values = validate_swap_form(form)?;
        let sell = self.tokens.resolve(values.sell_token);
        let buy = self.tokens.resolve(values.buy_token);

        let mut errors = ValidationErrors::new();
        let route = match self.pools.find_route(sell, buy).await {
            Ok(route) => route,
            Err(SdkError::NoRoute(..)) => {
                errors.push(Field::BuyToken, "no pool available for this pair");
                return Err(errors.into());
            }
            Err(e) => return Err(e),
        };

        let token_in = self.tokens.metadata(sell).await;
        let token_out = self.tokens.metadata(buy).await;
        let amount_in = match parse_amount(&values.sell_amount, token_in.decimals) {
            Ok(amount) => amount,
            Err(e) => {
                errors.push(Field::SellAmount, e.to_string());
                return Err(errors.into());
            }
        };

        let balance = self.tokens.balance_of(sell, recipient).await?;
        if balance < amount_in {
            errors.push(Field::SellAmount, "insufficient balance");
            return Err(errors.into());
        }

        let request = QuoteRequest {
            token_in: token_in.clone(),
            token_out: token_out.clone(),
            route: route.index_path(),
            amount_in: values.sell_amount.clone(),
        };
        let quote = match self.quotes.quote_latest(&request).await {
            QuoteOutcome::Fresh(Some(quote)) => quote,
            QuoteOutcome::Fresh(None) => {
                errors.push(Field::SellAmount, "no quote available");
                return Err(errors.into());
            }
            QuoteOutcome::Superseded => {
                errors.push(Field::SellAmount, "quote superseded by a newer request");
                return Err(errors.into());
            }
        };

        let params = SwapParams::new(
            sell,
            buy,
            route.index_path(),
            recipient,
            deadline_in(self.deadline_minutes),
            amount_in,
            quote.amount_out,
            values.slippage_bps,
        );

        Ok(PreparedSwap {
            params,
            route,
            quote,
            token_in,
            token_out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_is_in_the_future() {
        let now = chrono::Utc::now().timestamp() as u64;
        let deadline = deadline_in(20);
        assert!(deadline >= now + 20 * 60);
        assert!(deadline <= now + 20 * 60 + 5);
    }

    #[test]
    fn test_huge_deadline_saturates() {
        assert_eq!(deadline_in(u64::MAX), u64::MAX);
        assert!(deadline_in(u64::MAX / 60) > deadline_in(20));
    }
}
