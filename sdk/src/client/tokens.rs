use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use soda_core::{resolve_native, TokenMeta, TxKind, FALLBACK_SYMBOL};
use tracing::{debug, warn};

use crate::chain::{read, CallRequest, ChainClient, TransactionRequest};
use crate::contracts::IERC20;
use crate::error::SdkResult;

/// Why an address failed the ERC20 probe
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenCheck {
    Valid,
    NotAContract,
    NotErc20,
}

impl TokenCheck {
    pub fn message(self) -> Option<&'static str> {
        match self {
            TokenCheck::Valid => None,
            TokenCheck::NotAContract => Some("address is not a contract"),
            TokenCheck::NotErc20 => Some("contract is not a standard ERC20"),
        }
    }
}

/// Service for ERC20 reads and approvals
pub struct TokenService {
    chain: Arc<dyn ChainClient>,
    wrapped_native: Address,
}

impl TokenService {
    pub fn new(chain: Arc<dyn ChainClient>, wrapped_native: Address) -> Self {
        Self {
            chain,
            wrapped_native,
        }
    }

    /// Map the native-coin placeholder to the wrapped token
    pub fn resolve(&self, token: Address) -> Address {
        resolve_native(token, self.wrapped_native)
    }

    pub fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    /// Symbol and decimals for many tokens in one batch.
    ///
    /// A token is kept only when `decimals()` answered; a failed `symbol()`
    /// falls back to `Unknown`. Keys are the addresses as given.
    pub async fn metadata_batch(&self, tokens: &[Address]) -> HashMap<Address, TokenMeta> {
        let mut unique: Vec<Address> = Vec::with_capacity(tokens.len());
        for token in tokens {
            if !unique.contains(token) {
                unique.push(*token);
            }
        }
        if unique.is_empty() {
            return HashMap::new();
        }

        let requests = unique
            .iter()
            .flat_map(|token| {
                let target = self.resolve(*token);
                [
                    CallRequest::of(target, &IERC20::symbolCall {}),
                    CallRequest::of(target, &IERC20::decimalsCall {}),
                ]
            })
            .collect();
        let results = self.chain.call_batch(requests).await;

        let mut metas = HashMap::with_capacity(unique.len());
        for (token, pair) in unique.iter().zip(results.chunks(2)) {
            let [symbol, decimals] = pair else {
                continue;
            };
            let decimals = match decimals {
                Ok(data) => IERC20::decimalsCall::abi_decode_returns(data, true).map(|r| r.decimals),
                Err(e) => {
                    debug!("decimals() failed for {}: {}", token, e);
                    continue;
                }
            };
            let Ok(decimals) = decimals else {
                debug!("decimals() for {} returned undecodable data", token);
                continue;
            };
            let symbol = symbol
                .as_ref()
                .ok()
                .and_then(|data| IERC20::symbolCall::abi_decode_returns(data, true).ok())
                .map(|r| r.symbol)
                .unwrap_or_else(|| FALLBACK_SYMBOL.to_string());

            metas.insert(*token, TokenMeta::new(*token, symbol, decimals));
        }
        metas
    }

    /// Single-token metadata; any failure yields `Unknown` with 18 decimals
    pub async fn metadata(&self, token: Address) -> TokenMeta {
        let mut metas = self.metadata_batch(&[token]).await;
        metas.remove(&token).unwrap_or_else(|| {
            warn!("Could not read metadata for {}, using fallback", token);
            TokenMeta::unknown(token)
        })
    }

    pub async fn balance_of(&self, token: Address, account: Address) -> SdkResult<U256> {
        let ret = read(
            self.chain.as_ref(),
            self.resolve(token),
            &IERC20::balanceOfCall { account },
        )
        .await?;
        Ok(ret.balance)
    }

    pub async fn allowance(&self, token: Address, owner: Address, spender: Address) -> SdkResult<U256> {
        let ret = read(
            self.chain.as_ref(),
            self.resolve(token),
            &IERC20::allowanceCall { owner, spender },
        )
        .await?;
        Ok(ret.remaining)
    }

    /// Probe that `token` is deployed code answering `decimals()` and `totalSupply()`
    pub async fn check_erc20(&self, token: Address) -> SdkResult<TokenCheck> {
        let target = self.resolve(token);
        let code = self.chain.get_code(target).await?;
        if code.is_empty() {
            return Ok(TokenCheck::NotAContract);
        }

        let results = self
            .chain
            .call_batch(vec![
                CallRequest::of(target, &IERC20::decimalsCall {}),
                CallRequest::of(target, &IERC20::totalSupplyCall {}),
            ])
            .await;
        let decodes = match results.as_slice() {
            [Ok(decimals), Ok(supply)] => {
                IERC20::decimalsCall::abi_decode_returns(decimals, true).is_ok()
                    && IERC20::totalSupplyCall::abi_decode_returns(supply, true).is_ok()
            }
            _ => false,
        };

        Ok(if decodes {
            TokenCheck::Valid
        } else {
            TokenCheck::NotErc20
        })
    }

    pub fn approve_request(&self, token: Address, spender: Address, amount: U256) -> TransactionRequest {
        TransactionRequest::of(
            TxKind::Approve,
            self.resolve(token),
            &IERC20::approveCall { spender, amount },
        )
    }

    /// Tokens among `needs` whose allowance for `spender` is below the amount.
    /// Zero amounts never need an approval.
    pub async fn missing_allowances(
        &self,
        owner: Address,
        spender: Address,
        needs: &[(Address, U256)],
    ) -> SdkResult<Vec<(Address, U256)>> {
        let mut missing = Vec::new();
        for (token, amount) in needs {
            if amount.is_zero() {
                continue;
            }
            let current = self.allowance(*token, owner, spender).await?;
            if current < *amount {
                debug!("Allowance {} < {} for {} -> {}", current, amount, token, spender);
                missing.push((*token, *amount));
            }
        }
        Ok(missing)
    }
}
