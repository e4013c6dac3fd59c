//! Swap quotes via `quoteExactInput` simulation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use soda_core::math::{format_amount, is_zero_for_one, parse_amount, sqrt_price_limit};
use soda_core::{address_key, resolve_native, TokenMeta};
use tracing::debug;

use crate::chain::{CallRequest, ChainClient};
use crate::contracts::{u256_to_u160, ISwapRouter};

/// Inputs of one quote
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteRequest {
    pub token_in: TokenMeta,
    pub token_out: TokenMeta,
    /// Pool indices, in hop order
    pub route: Vec<u32>,
    /// Decimal amount of `token_in`
    pub amount_in: String,
}

/// Simulated swap output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quote {
    pub amount_in: U256,
    pub amount_out: U256,
    /// `amount_out` in `token_out` units
    pub formatted_out: String,
    pub zero_for_one: bool,
    pub sqrt_price_limit_x96: U256,
}

/// Result of [`QuoteFetcher::quote_latest`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuoteOutcome {
    /// Answer to the newest request; `None` when the simulation failed
    Fresh(Option<Quote>),
    /// A newer request was issued while this one ran
    Superseded,
}

impl QuoteOutcome {
    pub fn into_quote(self) -> Option<Quote> {
        match self {
            QuoteOutcome::Fresh(quote) => quote,
            QuoteOutcome::Superseded => None,
        }
    }
}

pub struct QuoteFetcher {
    chain: Arc<dyn ChainClient>,
    swap_router: Address,
    wrapped_native: Address,
    generation: AtomicU64,
}

impl QuoteFetcher {
    pub fn new(chain: Arc<dyn ChainClient>, swap_router: Address, wrapped_native: Address) -> Self {
        Self {
            chain,
            swap_router,
            wrapped_native,
            generation: AtomicU64::new(0),
        }
    }

    /// Simulate the swap. Any failure (bad amount, empty route, revert,
    /// undecodable result) is reported as no quote.
    pub async fn quote(&self, request: &QuoteRequest) -> Option<Quote> {
        if request.route.is_empty() {
            debug!("No route, skipping quote");
            return None;
        }
        let amount_in = match parse_amount(&request.amount_in, request.token_in.decimals) {
            Ok(amount) if !amount.is_zero() => amount,
            Ok(_) => return None,
            Err(e) => {
                debug!("Cannot quote {:?}: {}", request.amount_in, e);
                return None;
            }
        };

        let token_in = resolve_native(request.token_in.address, self.wrapped_native);
        let token_out = resolve_native(request.token_out.address, self.wrapped_native);
        let zero_for_one = is_zero_for_one(&address_key(&token_in), &address_key(&token_out));
        let limit = sqrt_price_limit(zero_for_one);

        let call = ISwapRouter::quoteExactInputCall {
            params: ISwapRouter::QuoteExactInputParams {
                tokenIn: token_in,
                tokenOut: token_out,
                indexPath: request.route.clone(),
                amountIn: amount_in,
                sqrtPriceLimitX96: u256_to_u160(limit).ok()?,
            },
        };

        let mut call_request = CallRequest::of(self.swap_router, &call);
        if let Ok(Some(account)) = self.chain.account().await {
            call_request = call_request.with_from(account);
        }

        let data = match self.chain.call(call_request).await {
            Ok(data) => data,
            Err(e) => {
                debug!("quoteExactInput failed: {}", e);
                return None;
            }
        };
        let amount_out = ISwapRouter::quoteExactInputCall::abi_decode_returns(&data, true)
            .ok()?
            .amountOut;

        Some(Quote {
            amount_in,
            amount_out,
            formatted_out: format_amount(amount_out, request.token_out.decimals),
            zero_for_one,
            sqrt_price_limit_x96: limit,
        })
    }

    /// Quote, discarding the answer if a newer request started meanwhile
    pub async fn quote_latest(&self, request: &QuoteRequest) -> QuoteOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let quote = self.quote(request).await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Quote generation {} superseded", generation);
            return QuoteOutcome::Superseded;
        }
        QuoteOutcome::Fresh(quote)
    }
}
