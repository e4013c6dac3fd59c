//! Periodic refresh loops

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::error::SdkResult;

/// A running refresh loop; stops when dropped
pub struct PollHandle<T> {
    task: JoinHandle<()>,
    updates: watch::Receiver<Option<T>>,
}

impl<T> PollHandle<T> {
    /// Latest successful result, `None` before the first one
    pub fn latest(&self) -> watch::Ref<'_, Option<T>> {
        self.updates.borrow()
    }

    /// Wait for the next successful result
    pub async fn changed(&mut self) -> bool {
        self.updates.changed().await.is_ok()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.updates.clone()
    }

    pub fn stop(self) {}
}

impl<T> Drop for PollHandle<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Run `fetch` now and then every `period`, publishing each success.
/// Failures are logged and the previous value is kept.
pub fn spawn_poll<T, F, Fut>(name: &'static str, period: Duration, mut fetch: F) -> PollHandle<T>
where
    T: Send + Sync + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = SdkResult<T>> + Send,
{
    let (sender, updates) = watch::channel(None);
    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match fetch().await {
                Ok(value) => {
                    debug!("{} refreshed", name);
                    if sender.send(Some(value)).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("{} refresh failed: {}", name, e),
            }
        }
    });
    PollHandle { task, updates }
}
