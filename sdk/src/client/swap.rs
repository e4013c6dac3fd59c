use std::sync::Arc;

use alloy_primitives::{Address, U256};
use soda_core::math::{apply_slippage, is_zero_for_one, sqrt_price_limit};
use soda_core::{address_key, TxKind};
use tracing::debug;

use super::tokens::TokenService;
use crate::chain::TransactionRequest;
use crate::contracts::{u256_to_u160, ISwapRouter};
use crate::error::SdkResult;

/// Fully resolved `exactInput` arguments
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapParams {
    pub token_in: Address,
    pub token_out: Address,
    pub index_path: Vec<u32>,
    pub recipient: Address,
    /// Unix seconds
    pub deadline: u64,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
    pub sqrt_price_limit_x96: U256,
}

impl SwapParams {
    /// Params for selling `amount_in` given a quoted output and slippage
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        token_in: Address,
        token_out: Address,
        index_path: Vec<u32>,
        recipient: Address,
        deadline: u64,
        amount_in: U256,
        quoted_out: U256,
        slippage_bps: u64,
    ) -> Self {
        let zero_for_one = is_zero_for_one(&address_key(&token_in), &address_key(&token_out));
        Self {
            token_in,
            token_out,
            index_path,
            recipient,
            deadline,
            amount_in,
            amount_out_minimum: apply_slippage(quoted_out, slippage_bps),
            sqrt_price_limit_x96: sqrt_price_limit(zero_for_one),
        }
    }
}

/// Service for swap-router transactions
pub struct SwapService {
    tokens: Arc<TokenService>,
    swap_router: Address,
}

impl SwapService {
    pub fn new(tokens: Arc<TokenService>, swap_router: Address) -> Self {
        Self { tokens, swap_router }
    }

    pub fn swap_router(&self) -> Address {
        self.swap_router
    }

    /// `exactInput` transaction; selling the wrapped native token attaches
    /// `amount_in` as call value
    pub fn exact_input_request(&self, params: &SwapParams) -> SdkResult<TransactionRequest> {
        let call = ISwapRouter::exactInputCall {
            params: ISwapRouter::ExactInputParams {
                tokenIn: params.token_in,
                tokenOut: params.token_out,
                indexPath: params.index_path.clone(),
                recipient: params.recipient,
                deadline: U256::from(params.deadline),
                amountIn: params.amount_in,
                amountOutMinimum: params.amount_out_minimum,
                sqrtPriceLimitX96: u256_to_u160(params.sqrt_price_limit_x96)?,
            },
        };
        let value = if params.token_in == self.tokens.wrapped_native() {
            params.amount_in
        } else {
            U256::ZERO
        };
        Ok(TransactionRequest::of(TxKind::Swap, self.swap_router, &call).with_value(value))
    }

    /// Unlimited approval of `token_in` when the router's allowance is short
    pub async fn approvals_for(
        &self,
        owner: Address,
        token_in: Address,
        amount_in: U256,
    ) -> SdkResult<Vec<TransactionRequest>> {
        let missing = self
            .tokens
            .missing_allowances(owner, self.swap_router, &[(token_in, amount_in)])
            .await?;
        if !missing.is_empty() {
            debug!("Router needs approval for {}", token_in);
        }
        Ok(missing
            .into_iter()
            .map(|(token, _)| self.tokens.approve_request(token, self.swap_router, U256::MAX))
            .collect())
    }

    /// Set the allowance of `spender` on `token` back to zero
    pub fn revoke_request(&self, token: Address, spender: Address) -> TransactionRequest {
        self.tokens.approve_request(token, spender, U256::ZERO)
    }
}
