//! Pending transactions and the per-action state machine

use std::fmt;

use alloy_primitives::B256;

use crate::errors::{CoreError, CoreResult};

/// What a transaction does
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TxKind {
    Approve,
    CreatePool,
    Mint,
    Swap,
    Collect,
    Burn,
}

impl TxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TxKind::Approve => "approve",
            TxKind::CreatePool => "create-pool",
            TxKind::Mint => "mint",
            TxKind::Swap => "swap",
            TxKind::Collect => "collect",
            TxKind::Burn => "burn",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a single submitted transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TxStatus {
    Submitted,
    Confirming,
    Confirmed,
    Failed,
}

impl TxStatus {
    pub fn is_final(self) -> bool {
        matches!(self, TxStatus::Confirmed | TxStatus::Failed)
    }
}

/// A transaction tracked for the lifetime of the session
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingTransaction {
    pub hash: B256,
    pub kind: TxKind,
    pub status: TxStatus,
}

impl PendingTransaction {
    pub fn submitted(hash: B256, kind: TxKind) -> Self {
        Self {
            hash,
            kind,
            status: TxStatus::Submitted,
        }
    }
}

/// State of one logical user action (approve* then main call)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ActionState {
    #[default]
    Idle,
    Submitted,
    Confirming,
    Confirmed,
    Failed,
}

/// Inputs that drive [`ActionState`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionEvent {
    /// A transaction of the action was accepted by the wallet
    Submit,
    /// Waiting on receipts
    AwaitReceipt,
    /// The final transaction of the action confirmed
    Confirm,
    Fail,
    /// Back to idle for the next action
    Reset,
}

impl ActionState {
    pub fn name(self) -> &'static str {
        match self {
            ActionState::Idle => "idle",
            ActionState::Submitted => "submitted",
            ActionState::Confirming => "confirming",
            ActionState::Confirmed => "confirmed",
            ActionState::Failed => "failed",
        }
    }

    pub fn is_in_flight(self) -> bool {
        matches!(self, ActionState::Submitted | ActionState::Confirming)
    }

    /// Apply `event`, rejecting transitions the lifecycle does not allow
    pub fn apply(self, event: ActionEvent) -> CoreResult<ActionState> {
        use ActionEvent::*;
        use ActionState::*;

        let next = match (self, event) {
            (Idle, Submit) => Submitted,
            // A dependent call is submitted after earlier steps confirmed
            (Confirming, Submit) => Submitted,
            (Submitted, AwaitReceipt) => Confirming,
            (Confirming, Confirm) => Confirmed,
            (Submitted | Confirming | Idle, Fail) => Failed,
            (Confirmed | Failed | Idle, Reset) => Idle,
            (from, event) => {
                return Err(CoreError::InvalidTransition {
                    from: from.name(),
                    event: event.name(),
                })
            }
        };
        Ok(next)
    }
}

impl ActionEvent {
    fn name(self) -> &'static str {
        match self {
            ActionEvent::Submit => "submit",
            ActionEvent::AwaitReceipt => "await-receipt",
            ActionEvent::Confirm => "confirm",
            ActionEvent::Fail => "fail",
            ActionEvent::Reset => "reset",
        }
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
