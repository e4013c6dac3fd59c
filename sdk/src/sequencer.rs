//! Transaction sequencing
//!
//! An action is a list of approvals followed by one dependent call. All
//! approvals are sent, then every approval receipt must come back successful
//! before the dependent call is sent. Any failure halts the action; nothing
//! is retried.

use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::{Address, B256};
use futures::future::join_all;
use soda_core::{ActionEvent, ActionState, PendingTransaction, TxKind, TxStatus};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::chain::{ChainClient, TransactionReceipt, TransactionRequest};
use crate::error::{SdkError, SdkResult};

/// Approvals plus the call that depends on them
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionPlan {
    pub approvals: Vec<TransactionRequest>,
    pub action: TransactionRequest,
}

impl ActionPlan {
    pub fn single(action: TransactionRequest) -> Self {
        Self {
            approvals: Vec::new(),
            action,
        }
    }

    pub fn with_approvals(approvals: Vec<TransactionRequest>, action: TransactionRequest) -> Self {
        Self { approvals, action }
    }

    pub fn kind(&self) -> TxKind {
        self.action.kind
    }
}

/// Receipts of a completed action
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionOutcome {
    pub approvals: Vec<TransactionReceipt>,
    pub receipt: TransactionReceipt,
}

impl ActionOutcome {
    pub fn hash(&self) -> B256 {
        self.receipt.hash
    }
}

/// Notifications published while an action runs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequencerEvent {
    Submitted { kind: TxKind, hash: B256 },
    Confirmed { kind: TxKind, hash: B256 },
    Failed { kind: TxKind, hash: Option<B256>, reason: String },
    Finished { kind: TxKind, state: ActionState },
}

/// Runs one action at a time against a [`ChainClient`]
pub struct TransactionSequencer {
    chain: Arc<dyn ChainClient>,
    state: Mutex<ActionState>,
    history: Mutex<Vec<PendingTransaction>>,
    events: Option<mpsc::UnboundedSender<SequencerEvent>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TransactionSequencer {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self {
            chain,
            state: Mutex::new(ActionState::Idle),
            history: Mutex::new(Vec::new()),
            events: None,
        }
    }

    /// Publish [`SequencerEvent`]s on `sender`
    pub fn with_events(mut self, sender: mpsc::UnboundedSender<SequencerEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn state(&self) -> ActionState {
        *locked(&self.state)
    }

    /// Transactions sent this session, oldest first
    pub fn history(&self) -> Vec<PendingTransaction> {
        locked(&self.history).clone()
    }

    /// Return a finished sequencer to `Idle`
    pub fn reset(&self) -> SdkResult<()> {
        self.transition(ActionEvent::Reset)?;
        Ok(())
    }

    fn transition(&self, event: ActionEvent) -> SdkResult<ActionState> {
        let mut state = locked(&self.state);
        let next = state.apply(event)?;
        debug!("Action state {} -> {}", state.name(), next.name());
        *state = next;
        Ok(next)
    }

    /// Claim the sequencer for a new action. The returned guard fails the
    /// action if it is dropped while still in flight.
    fn begin(&self, kind: TxKind) -> SdkResult<ActionGuard<'_>> {
        let mut state = locked(&self.state);
        if state.is_in_flight() {
            return Err(SdkError::ActionInFlight);
        }
        *state = state.apply(ActionEvent::Reset)?.apply(ActionEvent::Submit)?;
        Ok(ActionGuard { sequencer: self, kind })
    }

    /// The caller stopped polling an in-flight action
    fn abandon(&self, kind: TxKind) {
        let mut state = locked(&self.state);
        if !state.is_in_flight() {
            return;
        }
        warn!("{} abandoned while {}", kind, state.name());
        *state = ActionState::Failed;
        drop(state);
        self.emit(SequencerEvent::Finished {
            kind,
            state: ActionState::Failed,
        });
    }

    fn emit(&self, event: SequencerEvent) {
        if let Some(sender) = &self.events {
            // receiver gone means nobody is listening
            let _ = sender.send(event);
        }
    }

    fn record(&self, hash: B256, kind: TxKind) {
        locked(&self.history).push(PendingTransaction::submitted(hash, kind));
        self.emit(SequencerEvent::Submitted { kind, hash });
    }

    fn set_status(&self, hash: B256, status: TxStatus) {
        if let Some(tx) = locked(&self.history).iter_mut().find(|tx| tx.hash == hash) {
            tx.status = status;
        }
    }

    fn fail(&self, kind: TxKind, hash: Option<B256>, error: SdkError) -> SdkError {
        warn!("{} failed: {}", kind, error);
        if let Some(hash) = hash {
            self.set_status(hash, TxStatus::Failed);
        }
        // Fail is valid from every in-flight state
        let state = self.transition(ActionEvent::Fail).unwrap_or(ActionState::Failed);
        self.emit(SequencerEvent::Failed {
            kind,
            hash,
            reason: error.to_string(),
        });
        self.emit(SequencerEvent::Finished { kind, state });
        error
    }

    async fn send_all(&self, from: Address, requests: &[TransactionRequest]) -> SdkResult<Vec<B256>> {
        let mut hashes = Vec::with_capacity(requests.len());
        for request in requests {
            match self.chain.send_transaction(from, request).await {
                Ok(hash) => {
                    info!("Submitted {} transaction {}", request.kind, hash);
                    self.record(hash, request.kind);
                    hashes.push(hash);
                }
                Err(e) => return Err(self.fail(request.kind, None, e)),
            }
        }
        self.transition(ActionEvent::AwaitReceipt)?;
        for hash in &hashes {
            self.set_status(*hash, TxStatus::Confirming);
        }
        Ok(hashes)
    }

    /// Record the final status of one receipt without touching the action state
    fn settle(
        &self,
        kind: TxKind,
        hash: B256,
        receipt: SdkResult<TransactionReceipt>,
    ) -> SdkResult<TransactionReceipt> {
        match receipt {
            Ok(receipt) if receipt.success => {
                info!("Confirmed {} transaction {}", kind, hash);
                self.set_status(hash, TxStatus::Confirmed);
                self.emit(SequencerEvent::Confirmed { kind, hash });
                Ok(receipt)
            }
            Ok(_) => {
                self.set_status(hash, TxStatus::Failed);
                Err(SdkError::TransactionFailed { kind, hash })
            }
            Err(e) => {
                self.set_status(hash, TxStatus::Failed);
                Err(e)
            }
        }
    }

    /// Run `plan` to completion.
    ///
    /// Fails with [`SdkError::ActionInFlight`] if another action has not
    /// finished, and with [`SdkError::WalletNotConnected`] before anything is
    /// sent when no account is available. Dropping the returned future
    /// mid-flight marks the action failed so the next one can start.
    pub async fn execute(&self, plan: ActionPlan) -> SdkResult<ActionOutcome> {
        let from = self.chain.require_account().await?;
        let kind = plan.kind();
        let _guard = self.begin(kind)?;
        info!("Starting {} with {} approval(s)", kind, plan.approvals.len());

        let mut approvals = Vec::with_capacity(plan.approvals.len());
        if !plan.approvals.is_empty() {
            let hashes = self.send_all(from, &plan.approvals).await?;
            let receipts = join_all(hashes.iter().map(|hash| self.chain.wait_for_receipt(*hash))).await;

            // every receipt is recorded before the first failure is reported
            let mut first_failure = None;
            for ((request, hash), receipt) in plan.approvals.iter().zip(hashes).zip(receipts) {
                match self.settle(request.kind, hash, receipt) {
                    Ok(receipt) => approvals.push(receipt),
                    Err(e) => {
                        first_failure.get_or_insert((request.kind, hash, e));
                    }
                }
            }
            if let Some((kind, hash, e)) = first_failure {
                return Err(self.fail(kind, Some(hash), e));
            }
            self.transition(ActionEvent::Submit)?;
        }

        let hash = self
            .send_all(from, std::slice::from_ref(&plan.action))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SdkError::Other("no transaction hash returned".to_string()))?;
        let receipt = self.chain.wait_for_receipt(hash).await;
        let receipt = self
            .settle(kind, hash, receipt)
            .map_err(|e| self.fail(kind, Some(hash), e))?;

        let state = self.transition(ActionEvent::Confirm)?;
        self.emit(SequencerEvent::Finished { kind, state });
        Ok(ActionOutcome { approvals, receipt })
    }
}

/// Fails the action on drop unless it already finished
struct ActionGuard<'a> {
    sequencer: &'a TransactionSequencer,
    kind: TxKind,
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        self.sequencer.abandon(self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::IERC20;
    use crate::testing::MockChain;
    use alloy_primitives::{address, U256};

    const OWNER: Address = address!("00000000000000000000000000000000000000f1");
    const TOKEN: Address = address!("1000000000000000000000000000000000000001");

    fn approve() -> TransactionRequest {
        TransactionRequest::of(
            TxKind::Approve,
            TOKEN,
            &IERC20::approveCall {
                spender: OWNER,
                amount: U256::from(1u8),
            },
        )
    }

    fn collect_like() -> TransactionRequest {
        TransactionRequest {
            kind: TxKind::Collect,
            ..approve()
        }
    }

    #[tokio::test]
    async fn test_single_step_action() {
        let chain = Arc::new(MockChain::default().with_account(OWNER));
        let sequencer = TransactionSequencer::new(chain.clone());
        let outcome = sequencer.execute(ActionPlan::single(collect_like())).await.unwrap();

        assert_eq!(outcome.hash(), MockChain::hash_for(0));
        assert_eq!(sequencer.state(), ActionState::Confirmed);
        assert_eq!(sequencer.history()[0].status, TxStatus::Confirmed);
        assert_eq!(chain.sent()[0].from, OWNER);
    }

    #[tokio::test]
    async fn test_wallet_required() {
        let chain = Arc::new(MockChain::default());
        let sequencer = TransactionSequencer::new(chain.clone());
        let err = sequencer.execute(ActionPlan::single(collect_like())).await.unwrap_err();
        assert!(matches!(err, SdkError::WalletNotConnected));
        assert!(chain.sent().is_empty());
        assert_eq!(sequencer.state(), ActionState::Idle);
    }

    #[tokio::test]
    async fn test_rejected_send_fails_action() {
        let chain = Arc::new(MockChain::default().with_account(OWNER));
        chain.reject_send(0);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sequencer = TransactionSequencer::new(chain.clone()).with_events(tx);

        let err = sequencer
            .execute(ActionPlan::with_approvals(vec![approve()], collect_like()))
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::TransactionRejected { .. }));
        assert_eq!(sequencer.state(), ActionState::Failed);
        assert!(chain.sent().is_empty());

        assert!(matches!(rx.recv().await, Some(SequencerEvent::Failed { hash: None, .. })));
        assert_eq!(
            rx.recv().await,
            Some(SequencerEvent::Finished {
                kind: TxKind::Approve,
                state: ActionState::Failed
            })
        );
    }

    #[tokio::test]
    async fn test_reverted_action_marks_history() {
        let chain = Arc::new(MockChain::default().with_account(OWNER));
        chain.fail_send(0);
        let sequencer = TransactionSequencer::new(chain);
        let err = sequencer.execute(ActionPlan::single(collect_like())).await.unwrap_err();
        assert!(matches!(err, SdkError::TransactionFailed { kind: TxKind::Collect, .. }));
        assert_eq!(sequencer.history()[0].status, TxStatus::Failed);

        // a finished action does not block the next one
        assert!(sequencer.execute(ActionPlan::single(collect_like())).await.is_ok());
    }

    #[tokio::test]
    async fn test_dropped_action_releases_sequencer() {
        let chain = Arc::new(MockChain::default().with_account(OWNER));
        chain.gate_receipts();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sequencer = TransactionSequencer::new(chain.clone()).with_events(tx);

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            sequencer.execute(ActionPlan::single(collect_like())),
        )
        .await;
        assert!(timed_out.is_err());
        assert_eq!(sequencer.state(), ActionState::Failed);
        assert_eq!(rx.try_recv().ok(), Some(SequencerEvent::Submitted {
            kind: TxKind::Collect,
            hash: MockChain::hash_for(0),
        }));
        assert_eq!(rx.try_recv().ok(), Some(SequencerEvent::Finished {
            kind: TxKind::Collect,
            state: ActionState::Failed,
        }));

        chain.release_receipts(1);
        assert!(sequencer.execute(ActionPlan::single(collect_like())).await.is_ok());
        assert_eq!(sequencer.state(), ActionState::Confirmed);
    }

    #[tokio::test]
    async fn test_sibling_approval_settles_when_one_reverts() {
        let chain = Arc::new(MockChain::default().with_account(OWNER));
        chain.fail_send(0);
        let sequencer = TransactionSequencer::new(chain.clone());

        let err = sequencer
            .execute(ActionPlan::with_approvals(vec![approve(), approve()], collect_like()))
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::TransactionFailed { hash, .. } if hash == MockChain::hash_for(0)));

        let statuses: Vec<TxStatus> = sequencer.history().iter().map(|tx| tx.status).collect();
        assert_eq!(statuses, vec![TxStatus::Failed, TxStatus::Confirmed]);
        assert_eq!(chain.sent_kinds(), vec![TxKind::Approve, TxKind::Approve]);
    }
}
