//! Swap preparation, approval and quoting

mod common;

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use common::*;
use soda_sdk::contracts::{IERC20, ISwapRouter};
use soda_sdk::soda_core::validation::{Field, SwapForm};
use soda_sdk::soda_core::{TokenMeta, TxKind, NATIVE_TOKEN_PLACEHOLDER};
use soda_sdk::testing::MockChain;
use soda_sdk::{
    CallRequest, ChainClient, QuoteFetcher, QuoteOutcome, QuoteRequest, SdkError, SdkResult,
    TransactionReceipt, TransactionRequest,
};

fn swap_form(sell: Address, buy: Address, amount: &str) -> SwapForm {
    SwapForm {
        sell_token: sell.to_string(),
        buy_token: buy.to_string(),
        sell_amount: amount.to_string(),
        slippage: "0.5".to_string(),
    }
}

fn field_messages(err: SdkError, field: Field) -> Vec<String> {
    match err {
        SdkError::Validation(errors) => errors.messages(field).into_iter().map(str::to_string).collect(),
        other => panic!("expected field errors, got {other}"),
    }
}

#[tokio::test]
async fn test_swap_approves_router_then_swaps() {
    let chain = chain();
    set_pools(&chain, &[pool(TOKEN_A, TOKEN_B, 0, 3_000, 1_000_000)]);
    set_balance(&chain, TOKEN_A, units(10, 18));
    set_allowance(&chain, TOKEN_A, U256::ZERO);
    set_quote(&chain, U256::from(2_000_000u64));

    let (prepared, outcome) = client(&chain)
        .swap(&swap_form(TOKEN_A, TOKEN_B, "1"))
        .await
        .unwrap();
    assert_eq!(prepared.quote.formatted_out, "2");
    assert_eq!(outcome.approvals.len(), 1);

    let sent = chain.sent();
    assert_eq!(chain.sent_kinds(), vec![TxKind::Approve, TxKind::Swap]);
    let approve = IERC20::approveCall::abi_decode(&sent[0].request.data, true).unwrap();
    assert_eq!(sent[0].request.to, TOKEN_A);
    assert_eq!(approve.spender, SWAP_ROUTER);
    assert_eq!(approve.amount, U256::MAX);

    let swap = ISwapRouter::exactInputCall::abi_decode(&sent[1].request.data, true).unwrap();
    assert_eq!(sent[1].request.to, SWAP_ROUTER);
    assert_eq!(sent[1].request.value, U256::ZERO);
    assert_eq!(swap.params.indexPath, vec![0]);
    assert_eq!(swap.params.recipient, OWNER);
    assert_eq!(swap.params.amountIn, units(1, 18));
    assert_eq!(swap.params.amountOutMinimum, U256::from(1_990_000u64));
}

#[tokio::test]
async fn test_swap_skips_approval_with_allowance() {
    let chain = chain();
    set_pools(&chain, &[pool(TOKEN_A, TOKEN_B, 0, 3_000, 1_000_000)]);
    set_balance(&chain, TOKEN_A, units(10, 18));
    set_allowance(&chain, TOKEN_A, U256::MAX);
    set_quote(&chain, U256::from(2_000_000u64));

    client(&chain).swap(&swap_form(TOKEN_A, TOKEN_B, "1")).await.unwrap();
    assert_eq!(chain.sent_kinds(), vec![TxKind::Swap]);
}

#[tokio::test]
async fn test_selling_wrapped_native_attaches_value() {
    let chain = chain();
    set_pools(&chain, &[pool(TOKEN_B, WETH, 0, 500, 1_000_000)]);
    set_balance(&chain, WETH, units(5, 18));
    set_allowance(&chain, WETH, U256::MAX);
    set_quote(&chain, U256::from(3_000_000_000u64));

    let (prepared, _) = client(&chain)
        .swap(&swap_form(NATIVE_TOKEN_PLACEHOLDER, TOKEN_B, "2"))
        .await
        .unwrap();
    assert_eq!(prepared.params.token_in, WETH);
    // selling token1 for token0
    assert!(!prepared.quote.zero_for_one);

    let sent = chain.sent();
    assert_eq!(sent[0].request.value, units(2, 18));
}

#[tokio::test]
async fn test_route_prefers_deepest_pool() {
    let chain = chain();
    set_pools(
        &chain,
        &[
            pool(TOKEN_A, TOKEN_B, 0, 3_000, 10),
            pool(TOKEN_A, TOKEN_B, 1, 500, 1_000),
            pool(TOKEN_A, TOKEN_B, 2, 500, 0),
        ],
    );
    set_balance(&chain, TOKEN_B, units(10, 6));
    set_quote(&chain, U256::from(1u64));

    let prepared = client(&chain)
        .prepare_swap(&swap_form(TOKEN_B, TOKEN_A, "1"))
        .await
        .unwrap();
    assert_eq!(prepared.route.index_path(), vec![1, 0]);
    assert_eq!(prepared.params.index_path, vec![1, 0]);
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn test_multi_pool_route_reaches_router() {
    let chain = chain();
    set_pools(
        &chain,
        &[
            pool(TOKEN_A, TOKEN_B, 0, 3_000, 10),
            pool(TOKEN_A, TOKEN_B, 1, 500, 1_000),
        ],
    );
    set_balance(&chain, TOKEN_B, units(10, 6));
    set_allowance(&chain, TOKEN_B, U256::MAX);
    set_quote(&chain, U256::from(7u64));

    let (prepared, _) = client(&chain)
        .swap(&swap_form(TOKEN_B, TOKEN_A, "1"))
        .await
        .unwrap();
    assert_eq!(prepared.route.index_path(), vec![1, 0]);

    let sent = chain.sent();
    assert_eq!(chain.sent_kinds(), vec![TxKind::Swap]);
    let swap = ISwapRouter::exactInputCall::abi_decode(&sent[0].request.data, true).unwrap();
    assert_eq!(swap.params.indexPath, vec![1, 0]);
    assert_eq!(swap.params.tokenIn, TOKEN_B);
    assert_eq!(swap.params.tokenOut, TOKEN_A);
    assert_eq!(swap.params.amountIn, units(1, 6));
}

#[tokio::test]
async fn test_no_pool_is_a_buy_token_error() {
    let chain = chain();
    set_pools(&chain, &[pool(TOKEN_B, WETH, 0, 500, 1_000)]);

    let err = client(&chain)
        .prepare_swap(&swap_form(TOKEN_A, TOKEN_B, "1"))
        .await
        .unwrap_err();
    assert_eq!(field_messages(err, Field::BuyToken), vec!["no pool available for this pair"]);
}

#[tokio::test]
async fn test_insufficient_balance_blocks_swap() {
    let chain = chain();
    set_pools(&chain, &[pool(TOKEN_A, TOKEN_B, 0, 3_000, 1_000)]);
    set_balance(&chain, TOKEN_A, units(1, 18));
    set_quote(&chain, U256::from(1u64));

    let err = client(&chain)
        .swap(&swap_form(TOKEN_A, TOKEN_B, "2"))
        .await
        .unwrap_err();
    assert_eq!(field_messages(err, Field::SellAmount), vec!["insufficient balance"]);
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn test_swap_without_quote_is_blocked() {
    let chain = chain();
    set_pools(&chain, &[pool(TOKEN_A, TOKEN_B, 0, 3_000, 1_000)]);
    set_balance(&chain, TOKEN_A, units(10, 18));
    chain.revert_call::<ISwapRouter::quoteExactInputCall>(SWAP_ROUTER, "SPL");

    let err = client(&chain)
        .swap(&swap_form(TOKEN_A, TOKEN_B, "1"))
        .await
        .unwrap_err();
    assert_eq!(field_messages(err, Field::SellAmount), vec!["no quote available"]);
    assert!(chain.sent().is_empty());
}

/// Delays every read so overlapping quotes can be observed
struct SlowChain {
    inner: MockChain,
    delay: Duration,
}

#[async_trait]
impl ChainClient for SlowChain {
    async fn chain_id(&self) -> SdkResult<u64> {
        self.inner.chain_id().await
    }

    async fn account(&self) -> SdkResult<Option<Address>> {
        self.inner.account().await
    }

    async fn get_code(&self, address: Address) -> SdkResult<Bytes> {
        self.inner.get_code(address).await
    }

    async fn call(&self, request: CallRequest) -> SdkResult<Bytes> {
        tokio::time::sleep(self.delay).await;
        self.inner.call(request).await
    }

    async fn send_transaction(&self, from: Address, request: &TransactionRequest) -> SdkResult<B256> {
        self.inner.send_transaction(from, request).await
    }

    async fn wait_for_receipt(&self, hash: B256) -> SdkResult<TransactionReceipt> {
        self.inner.wait_for_receipt(hash).await
    }
}

fn quote_request(amount: &str) -> QuoteRequest {
    QuoteRequest {
        token_in: TokenMeta::new(TOKEN_A, "AAA", 18),
        token_out: TokenMeta::new(TOKEN_B, "BBB", 6),
        route: vec![0],
        amount_in: amount.to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_older_quote_is_superseded() {
    let inner = MockChain::default();
    set_quote(&inner, U256::from(4_000_000u64));
    let chain = Arc::new(SlowChain {
        inner,
        delay: Duration::from_millis(250),
    });
    let fetcher = QuoteFetcher::new(chain, SWAP_ROUTER, WETH);

    let first = quote_request("1");
    let second = quote_request("2");
    let (older, newer) = tokio::join!(fetcher.quote_latest(&first), fetcher.quote_latest(&second));

    assert_eq!(older, QuoteOutcome::Superseded);
    let quote = newer.into_quote().unwrap();
    assert_eq!(quote.amount_in, units(2, 18));
    assert_eq!(quote.formatted_out, "4");
}

#[tokio::test]
async fn test_quote_failure_is_none() {
    let chain = Arc::new(MockChain::default());
    chain.revert_call::<ISwapRouter::quoteExactInputCall>(SWAP_ROUTER, "SPL");
    let fetcher = QuoteFetcher::new(chain, SWAP_ROUTER, WETH);

    assert_eq!(fetcher.quote_latest(&quote_request("1")).await, QuoteOutcome::Fresh(None));
    assert_eq!(fetcher.quote(&quote_request("0")).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_swap_preparations_keep_newest_quote() {
    let inner = MockChain::default().with_account(OWNER);
    deploy_token(&inner, TOKEN_A, "AAA", 18);
    deploy_token(&inner, TOKEN_B, "BBB", 6);
    set_pools(&inner, &[pool(TOKEN_A, TOKEN_B, 0, 3_000, 1_000_000)]);
    set_balance(&inner, TOKEN_A, units(10, 18));
    set_quote(&inner, U256::from(2_000_000u64));
    let chain = Arc::new(SlowChain {
        inner,
        delay: Duration::from_millis(100),
    });
    let client = soda_sdk::SodaClient::with_chain(chain, config());

    let first = swap_form(TOKEN_A, TOKEN_B, "1");
    let second = swap_form(TOKEN_A, TOKEN_B, "2");
    let (a, b) = tokio::join!(client.prepare_swap(&first), client.prepare_swap(&second));

    let (fresh, stale) = match (a, b) {
        (Ok(fresh), Err(stale)) | (Err(stale), Ok(fresh)) => (fresh, stale),
        (a, b) => panic!("expected one superseded preparation, got {:?} and {:?}", a.is_ok(), b.is_ok()),
    };
    assert_eq!(field_messages(stale, Field::SellAmount), vec!["quote superseded by a newer request"]);
    assert_eq!(fresh.quote.formatted_out, "2");
}
