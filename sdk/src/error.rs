//! SDK error types

use alloy_primitives::B256;
use soda_core::{validation::ValidationErrors, CoreError, TxKind};
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// JSON-RPC transport or node error
    #[error("RPC error: {0}")]
    Rpc(String),

    /// ABI encoding or decoding failed
    #[error("ABI error: {0}")]
    Abi(String),

    /// Domain rule violated
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Form input rejected; field-scoped
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// No account available from the wallet session
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// A transaction was mined but reverted
    #[error("{kind} transaction {hash} failed")]
    TransactionFailed { kind: TxKind, hash: B256 },

    /// The wallet refused or could not send a transaction
    #[error("{kind} transaction rejected: {reason}")]
    TransactionRejected { kind: TxKind, reason: String },

    /// No receipt within the configured timeout
    #[error("Timed out waiting for receipt of {0}")]
    ReceiptTimeout(B256),

    /// A sequenced action is already submitted or confirming
    #[error("Another action is already in flight")]
    ActionInFlight,

    /// No available pool joins the two tokens
    #[error("No route found from {0} to {1}")]
    NoRoute(String, String),

    /// Configuration file or value error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error
    #[error("SDK error: {0}")]
    Other(String),
}

impl From<alloy_sol_types::Error> for SdkError {
    fn from(err: alloy_sol_types::Error) -> Self {
        SdkError::Abi(err.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Rpc(format!("invalid JSON: {err}"))
    }
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::Other(err.to_string())
    }
}

impl From<tokio::task::JoinError> for SdkError {
    fn from(err: tokio::task::JoinError) -> Self {
        SdkError::Other(format!("background task failed: {err}"))
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
