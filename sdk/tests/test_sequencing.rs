//! Approve-then-act ordering through the client

mod common;

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::U256;
use alloy_sol_types::SolCall;
use common::*;
use soda_sdk::contracts::{IERC20, IPositionManager};
use soda_sdk::soda_core::validation::CreatePositionForm;
use soda_sdk::soda_core::{ActionState, TxKind, TxStatus};
use soda_sdk::testing::{ChainEvent, MockChain};
use soda_sdk::{SdkError, SequencerEvent};
use tokio::sync::mpsc;

fn mint_form() -> CreatePositionForm {
    CreatePositionForm {
        token0: TOKEN_A.to_string(),
        token1: TOKEN_B.to_string(),
        index: "0".to_string(),
        amount0: "1.5".to_string(),
        amount1: "2".to_string(),
    }
}

#[tokio::test]
async fn test_mint_waits_for_both_approvals() {
    let chain = chain();
    set_allowance(&chain, TOKEN_A, U256::ZERO);
    set_allowance(&chain, TOKEN_B, U256::ZERO);
    chain.gate_receipts();

    let client = Arc::new(client(&chain));
    let task = {
        let client = client.clone();
        tokio::spawn(async move { client.mint(&mint_form()).await })
    };

    let watched = chain.clone();
    wait_until(|| {
        let chain = watched.clone();
        async move { chain.sent().len() == 2 }
    })
    .await;
    assert_eq!(chain.sent_kinds(), vec![TxKind::Approve, TxKind::Approve]);

    // one approval mined is not enough
    chain.release_receipts(1);
    settle().await;
    assert_eq!(chain.sent().len(), 2);

    chain.release_receipts(1);
    let watched = chain.clone();
    wait_until(|| {
        let chain = watched.clone();
        async move { chain.sent().len() == 3 }
    })
    .await;
    chain.release_receipts(1);

    let outcome = task.await.unwrap().unwrap();
    assert_eq!(outcome.approvals.len(), 2);
    assert_eq!(outcome.hash(), MockChain::hash_for(2));
    assert_eq!(client.sequencer.state(), ActionState::Confirmed);

    let events = chain.events();
    let mint_sent = events
        .iter()
        .position(|e| matches!(e, ChainEvent::Sent { kind: TxKind::Mint, .. }))
        .unwrap();
    let approvals_mined = events
        .iter()
        .filter(|e| matches!(e, ChainEvent::Mined { kind: TxKind::Approve, .. }))
        .count();
    assert_eq!(approvals_mined, 2);
    let mined_before_mint = events[..mint_sent]
        .iter()
        .filter(|e| matches!(e, ChainEvent::Mined { .. }))
        .count();
    assert_eq!(mined_before_mint, 2);
}

#[tokio::test]
async fn test_mint_approves_exact_amounts_to_position_manager() {
    let chain = chain();
    set_allowance(&chain, TOKEN_A, U256::ZERO);
    set_allowance(&chain, TOKEN_B, U256::ZERO);

    client(&chain).mint(&mint_form()).await.unwrap();

    let sent = chain.sent();
    assert_eq!(sent.len(), 3);
    let first = IERC20::approveCall::abi_decode(&sent[0].request.data, true).unwrap();
    assert_eq!(sent[0].request.to, TOKEN_A);
    assert_eq!(first.spender, POSITION_MANAGER);
    assert_eq!(first.amount, U256::from(15u8) * U256::from(10u8).pow(U256::from(17u8)));

    let second = IERC20::approveCall::abi_decode(&sent[1].request.data, true).unwrap();
    assert_eq!(sent[1].request.to, TOKEN_B);
    assert_eq!(second.amount, units(2, 6));

    let mint = IPositionManager::mintCall::abi_decode(&sent[2].request.data, true).unwrap();
    assert_eq!(sent[2].request.to, POSITION_MANAGER);
    assert_eq!(mint.params.recipient, OWNER);
    assert_eq!(mint.params.amount1Desired, units(2, 6));
    assert!(mint.params.deadline > U256::ZERO);
}

#[tokio::test]
async fn test_mint_skips_sufficient_allowances() {
    let chain = chain();
    set_allowance(&chain, TOKEN_A, U256::MAX);
    set_allowance(&chain, TOKEN_B, U256::MAX);

    let outcome = client(&chain).mint(&mint_form()).await.unwrap();
    assert!(outcome.approvals.is_empty());
    assert_eq!(chain.sent_kinds(), vec![TxKind::Mint]);
}

#[tokio::test]
async fn test_zero_amount_needs_no_approval() {
    let chain = chain();
    set_allowance(&chain, TOKEN_A, U256::ZERO);
    set_allowance(&chain, TOKEN_B, U256::ZERO);

    let form = CreatePositionForm {
        amount1: String::new(),
        ..mint_form()
    };
    client(&chain).mint(&form).await.unwrap();
    assert_eq!(chain.sent_kinds(), vec![TxKind::Approve, TxKind::Mint]);
    assert_eq!(chain.sent()[0].request.to, TOKEN_A);
}

#[tokio::test]
async fn test_failed_approval_halts_sequence() {
    let chain = chain();
    set_allowance(&chain, TOKEN_A, U256::ZERO);
    set_allowance(&chain, TOKEN_B, U256::ZERO);
    chain.fail_send(1);

    let (sender, mut events) = mpsc::unbounded_channel();
    let client = client(&chain).with_events(sender);
    let err = client.mint(&mint_form()).await.unwrap_err();

    assert!(matches!(
        err,
        SdkError::TransactionFailed {
            kind: TxKind::Approve,
            ..
        }
    ));
    assert_eq!(chain.sent_kinds(), vec![TxKind::Approve, TxKind::Approve]);
    assert_eq!(client.sequencer.state(), ActionState::Failed);

    let mut failed = false;
    while let Ok(event) = events.try_recv() {
        if let SequencerEvent::Failed { hash, .. } = event {
            assert_eq!(hash, Some(MockChain::hash_for(1)));
            failed = true;
        }
    }
    assert!(failed);

    // the sibling approval's receipt is recorded too
    let statuses: Vec<TxStatus> = client.sequencer.history().iter().map(|tx| tx.status).collect();
    assert_eq!(statuses, vec![TxStatus::Confirmed, TxStatus::Failed]);
    assert!(client.sequencer.history().iter().all(|tx| tx.status != TxStatus::Confirming));

    // a finished action does not block the next one
    client.collect(U256::from(1u8)).await.unwrap();
    assert_eq!(client.sequencer.state(), ActionState::Confirmed);
}

#[tokio::test]
async fn test_second_action_rejected_while_in_flight() {
    let chain = chain();
    chain.gate_receipts();
    let client = Arc::new(client(&chain));

    let task = {
        let client = client.clone();
        tokio::spawn(async move { client.burn(U256::from(7u8)).await })
    };
    let watched = chain.clone();
    wait_until(|| {
        let chain = watched.clone();
        async move { !chain.sent().is_empty() }
    })
    .await;

    let err = client.collect(U256::from(7u8)).await.unwrap_err();
    assert!(matches!(err, SdkError::ActionInFlight));
    assert_eq!(chain.sent_kinds(), vec![TxKind::Burn]);

    chain.release_receipts(1);
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_actions_require_wallet() {
    let chain = chain();
    chain.disconnect();
    let err = client(&chain).mint(&mint_form()).await.unwrap_err();
    assert!(matches!(err, SdkError::WalletNotConnected));
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn test_timed_out_action_does_not_wedge_client() {
    let chain = chain();
    chain.gate_receipts();
    let client = client(&chain);

    let timed_out = tokio::time::timeout(Duration::from_millis(50), client.burn(U256::from(7u8))).await;
    assert!(timed_out.is_err());
    assert_eq!(client.sequencer.state(), ActionState::Failed);

    chain.release_receipts(1);
    client.collect(U256::from(7u8)).await.unwrap();
    assert_eq!(chain.sent_kinds(), vec![TxKind::Burn, TxKind::Collect]);
    assert_eq!(client.sequencer.state(), ActionState::Confirmed);
}
