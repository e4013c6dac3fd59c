//! Testing utilities
//!
//! [`MockChain`] is an in-memory [`ChainClient`]: contract reads are answered
//! from programmed responses, sends are recorded, and receipts can be held
//! back with a gate to observe sequencing.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use soda_core::TxKind;
use tokio::sync::Semaphore;

use crate::chain::{CallRequest, ChainClient, TransactionReceipt, TransactionRequest};
use crate::error::{SdkError, SdkResult};

/// Observable chain activity, in order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainEvent {
    Sent { kind: TxKind, hash: B256 },
    Mined { kind: TxKind, hash: B256, success: bool },
}

/// A transaction the mock accepted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentTransaction {
    pub from: Address,
    pub hash: B256,
    pub request: TransactionRequest,
}

#[derive(Clone, Debug)]
enum Response {
    Return(Bytes),
    Revert(String),
}

#[derive(Default)]
struct State {
    chain_id: u64,
    account: Option<Address>,
    code: HashMap<Address, Bytes>,
    by_selector: HashMap<(Address, [u8; 4]), Response>,
    by_calldata: HashMap<(Address, Bytes), Response>,
    calls: Vec<CallRequest>,
    sent: Vec<SentTransaction>,
    failed_sends: HashSet<usize>,
    rejected_sends: HashSet<usize>,
    send_attempts: usize,
    events: Vec<ChainEvent>,
}

/// In-memory chain for tests
pub struct MockChain {
    state: Mutex<State>,
    receipt_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new(31_337)
    }
}

impl MockChain {
    pub fn new(chain_id: u64) -> Self {
        Self {
            state: Mutex::new(State {
                chain_id,
                ..State::default()
            }),
            receipt_gate: Mutex::new(None),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Hash the mock assigns to the `n`-th sent transaction (0-based)
    pub fn hash_for(n: usize) -> B256 {
        B256::from(U256::from(n as u64 + 1).to_be_bytes::<32>())
    }

    pub fn with_account(self, account: Address) -> Self {
        self.state().account = Some(account);
        self
    }

    pub fn disconnect(&self) {
        self.state().account = None;
    }

    /// Deploy placeholder bytecode at `address`
    pub fn set_code(&self, address: Address, code: impl Into<Bytes>) {
        self.state().code.insert(address, code.into());
    }

    /// Answer every `C` call to `to` with already-encoded return data
    pub fn on_call<C: SolCall>(&self, to: Address, returns: Vec<u8>) {
        self.state()
            .by_selector
            .insert((to, C::SELECTOR), Response::Return(returns.into()));
    }

    /// Answer one exact call (selector + arguments) to `to`
    pub fn on_exact<C: SolCall>(&self, to: Address, call: &C, returns: Vec<u8>) {
        self.state()
            .by_calldata
            .insert((to, call.abi_encode().into()), Response::Return(returns.into()));
    }

    /// Make every `C` call to `to` revert
    pub fn revert_call<C: SolCall>(&self, to: Address, reason: &str) {
        self.state()
            .by_selector
            .insert((to, C::SELECTOR), Response::Revert(reason.to_string()));
    }

    /// The `n`-th accepted transaction (0-based) is mined but reverts
    pub fn fail_send(&self, n: usize) {
        self.state().failed_sends.insert(n);
    }

    /// The wallet refuses the `n`-th send attempt (0-based)
    pub fn reject_send(&self, n: usize) {
        self.state().rejected_sends.insert(n);
    }

    /// Hold receipts until [`MockChain::release_receipts`] is called
    pub fn gate_receipts(&self) {
        *self
            .receipt_gate
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let `n` held receipts through
    pub fn release_receipts(&self, n: usize) {
        if let Some(gate) = self.gate() {
            gate.add_permits(n);
        }
    }

    fn gate(&self) -> Option<Arc<Semaphore>> {
        self.receipt_gate
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn sent(&self) -> Vec<SentTransaction> {
        self.state().sent.clone()
    }

    pub fn sent_kinds(&self) -> Vec<TxKind> {
        self.state().sent.iter().map(|tx| tx.request.kind).collect()
    }

    pub fn events(&self) -> Vec<ChainEvent> {
        self.state().events.clone()
    }

    pub fn calls(&self) -> Vec<CallRequest> {
        self.state().calls.clone()
    }

    /// Number of reads sent to `to` with selector `C`
    pub fn call_count<C: SolCall>(&self, to: Address) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.to == to && c.data.starts_with(&C::SELECTOR))
            .count()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn chain_id(&self) -> SdkResult<u64> {
        Ok(self.state().chain_id)
    }

    async fn account(&self) -> SdkResult<Option<Address>> {
        Ok(self.state().account)
    }

    async fn get_code(&self, address: Address) -> SdkResult<Bytes> {
        Ok(self.state().code.get(&address).cloned().unwrap_or_default())
    }

    async fn call(&self, request: CallRequest) -> SdkResult<Bytes> {
        let mut state = self.state();
        state.calls.push(request.clone());

        let exact = state.by_calldata.get(&(request.to, request.data.clone())).cloned();
        let response = exact.or_else(|| {
            let selector: [u8; 4] = request.data.get(..4)?.try_into().ok()?;
            state.by_selector.get(&(request.to, selector)).cloned()
        });

        match response {
            Some(Response::Return(data)) => Ok(data),
            Some(Response::Revert(reason)) => Err(SdkError::Rpc(format!("execution reverted: {reason}"))),
            None => Err(SdkError::Rpc(format!("execution reverted: no code at {}", request.to))),
        }
    }

    async fn send_transaction(&self, from: Address, request: &TransactionRequest) -> SdkResult<B256> {
        let mut state = self.state();
        let attempt = state.send_attempts;
        state.send_attempts += 1;
        if state.rejected_sends.contains(&attempt) {
            return Err(SdkError::TransactionRejected {
                kind: request.kind,
                reason: "user rejected the request".to_string(),
            });
        }
        let hash = Self::hash_for(state.sent.len());
        state.sent.push(SentTransaction {
            from,
            hash,
            request: request.clone(),
        });
        state.events.push(ChainEvent::Sent {
            kind: request.kind,
            hash,
        });
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: B256) -> SdkResult<TransactionReceipt> {
        if let Some(gate) = self.gate() {
            gate.acquire()
                .await
                .map_err(|e| SdkError::Other(e.to_string()))?
                .forget();
        }

        let mut state = self.state();
        let Some(index) = state.sent.iter().position(|tx| tx.hash == hash) else {
            return Err(SdkError::Rpc(format!("unknown transaction {hash}")));
        };
        let kind = state.sent[index].request.kind;
        let success = !state.failed_sends.contains(&index);
        state.events.push(ChainEvent::Mined { kind, hash, success });

        Ok(TransactionReceipt {
            hash,
            block_number: Some(index as u64 + 1),
            success,
        })
    }
}
