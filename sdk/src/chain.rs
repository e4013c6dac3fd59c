//! Chain access seam
//!
//! Everything the SDK needs from a node and a wallet, behind one trait so
//! services can run against [`crate::rpc::JsonRpcClient`] or the in-memory
//! [`crate::testing::MockChain`].

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use soda_core::TxKind;

use crate::error::{SdkError, SdkResult};

/// Read-only contract call (`eth_call`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallRequest {
    pub to: Address,
    pub data: Bytes,
    pub from: Option<Address>,
    pub value: U256,
}

impl CallRequest {
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
            from: None,
            value: U256::ZERO,
        }
    }

    /// Encode a typed call
    pub fn of<C: SolCall>(to: Address, call: &C) -> Self {
        Self::new(to, call.abi_encode())
    }

    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// State-changing call sent through the wallet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    pub kind: TxKind,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

impl TransactionRequest {
    pub fn of<C: SolCall>(kind: TxKind, to: Address, call: &C) -> Self {
        Self {
            kind,
            to,
            data: call.abi_encode().into(),
            value: U256::ZERO,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Mined transaction outcome
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub hash: B256,
    pub block_number: Option<u64>,
    pub success: bool,
}

/// Node + wallet collaborator
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn chain_id(&self) -> SdkResult<u64>;

    /// Connected account, `None` when the wallet session has none
    async fn account(&self) -> SdkResult<Option<Address>>;

    async fn get_code(&self, address: Address) -> SdkResult<Bytes>;

    async fn call(&self, request: CallRequest) -> SdkResult<Bytes>;

    /// Batched reads; each entry fails independently
    async fn call_batch(&self, requests: Vec<CallRequest>) -> Vec<SdkResult<Bytes>> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.call(request).await);
        }
        results
    }

    async fn send_transaction(&self, from: Address, request: &TransactionRequest) -> SdkResult<B256>;

    async fn wait_for_receipt(&self, hash: B256) -> SdkResult<TransactionReceipt>;

    /// Connected account or [`SdkError::WalletNotConnected`]
    async fn require_account(&self) -> SdkResult<Address> {
        self.account().await?.ok_or(SdkError::WalletNotConnected)
    }
}

/// Run a typed read and decode its return values
pub async fn read<C: SolCall>(
    chain: &dyn ChainClient,
    to: Address,
    call: &C,
) -> SdkResult<C::Return> {
    let data = chain.call(CallRequest::of(to, call)).await?;
    Ok(C::abi_decode_returns(&data, true)?)
}
