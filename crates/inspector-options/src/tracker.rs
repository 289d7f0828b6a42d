//! # Async Task Tracker
//!
//! Counts outstanding asynchronous operations so the panel can show a
//! spinner while any of them is in flight.
//!
//! ## Lifecycle of a Tracked Operation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      track(operation)                                   │
//! │                                                                         │
//! │  begin() ──► count += 1, TaskGuard returned                            │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  operation.await                                                        │
//! │     │                                                                   │
//! │     ├── Ok(value)  ──► Some(value)                                     │
//! │     └── Err(e)     ──► error! logged, None   (never returned)          │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  TaskGuard dropped ──► count -= 1 ──► notify()                         │
//! │                                                                         │
//! │  The guard is the only way to decrement, and it decrements once, so    │
//! │  the count can neither go negative nor leak.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::notifier::UpdateNotifier;

/// Tracks how many asynchronous operations are outstanding.
///
/// Cloning is cheap; clones share the same count and notifier.
#[derive(Debug, Clone)]
pub struct AsyncTaskTracker {
    count: Arc<AtomicUsize>,
    notifier: Arc<UpdateNotifier>,
}

/// Outstanding-operation token. Dropping it settles the operation.
#[must_use = "dropping the guard settles the operation immediately"]
pub(crate) struct TaskGuard {
    count: Arc<AtomicUsize>,
    notifier: Arc<UpdateNotifier>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        let remaining = self.count.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!(remaining, "Tracked operation settled");
        self.notifier.notify(None);
    }
}

impl AsyncTaskTracker {
    /// Creates a tracker that notifies through `notifier` on every settlement.
    pub fn new(notifier: Arc<UpdateNotifier>) -> Self {
        AsyncTaskTracker {
            count: Arc::new(AtomicUsize::new(0)),
            notifier,
        }
    }

    /// Marks one operation as started.
    pub(crate) fn begin(&self) -> TaskGuard {
        let outstanding = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(outstanding, "Tracked operation started");
        TaskGuard {
            count: self.count.clone(),
            notifier: self.notifier.clone(),
        }
    }

    /// Awaits `operation` while counting it as outstanding.
    ///
    /// Returns `Some` with the operation's value on success. A failure is
    /// logged and swallowed (`None`). Either way the count is decremented
    /// once and exactly one notification follows.
    pub async fn track<F, T, E>(&self, operation: F) -> Option<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let guard = self.begin();
        let outcome = settle(operation).await;
        drop(guard);
        outcome
    }

    /// Runs `operation` as a background task while counting it as
    /// outstanding.
    ///
    /// The count is incremented before this returns, so `is_busy()` is
    /// already true for the caller.
    ///
    /// Without a tokio runtime the operation cannot run. It is dropped and
    /// settles as a failure (logged, one notification) and `None` is
    /// returned.
    pub fn spawn<F, T, E>(&self, operation: F) -> Option<JoinHandle<Option<T>>>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let guard = self.begin();
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(error = %e, "No async runtime, tracked operation dropped");
                drop(guard);
                return None;
            }
        };

        Some(handle.spawn(async move {
            let outcome = settle(operation).await;
            drop(guard);
            outcome
        }))
    }

    /// Returns true while any tracked operation is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending() > 0
    }

    /// Number of outstanding operations.
    pub fn pending(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

async fn settle<F, T, E>(operation: F) -> Option<T>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match operation.await {
        Ok(value) => Some(value),
        Err(e) => {
            error!(error = %e, "Tracked operation failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn tracker_with_observer() -> (AsyncTaskTracker, Arc<AtomicUsize>) {
        let notifier = Arc::new(UpdateNotifier::new());
        let notified = Arc::new(AtomicUsize::new(0));
        let n = notified.clone();
        notifier.set_test_observer(move || {
            n.fetch_add(1, Ordering::SeqCst);
        });
        (AsyncTaskTracker::new(notifier), notified)
    }

    #[tokio::test]
    async fn test_successful_operation() {
        let (tracker, notified) = tracker_with_observer();
        let value = tracker.track(async { Ok::<_, String>(42) }).await;

        assert_eq!(value, Some(42));
        assert!(!tracker.is_busy());
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_operation_is_swallowed() {
        let (tracker, notified) = tracker_with_observer();
        let value: Option<()> = tracker
            .track(async { Err::<(), _>("session expired") })
            .await;

        assert_eq!(value, None);
        assert!(!tracker.is_busy());
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_busy_until_every_operation_settles() {
        let (tracker, notified) = tracker_with_observer();
        let mut senders = Vec::new();
        let mut handles = Vec::new();

        for _ in 0..3 {
            let (tx, rx) = oneshot::channel::<Result<(), String>>();
            senders.push(tx);
            handles.push(
                tracker
                    .spawn(async move { rx.await.unwrap_or_else(|_| Err("dropped".to_string())) })
                    .unwrap(),
            );
        }
        assert_eq!(tracker.pending(), 3);

        let mut settled = 0;
        for (i, tx) in senders.into_iter().enumerate() {
            let outcome = if i % 2 == 0 { Ok(()) } else { Err("boom".to_string()) };
            tx.send(outcome).unwrap();
            handles.remove(0).await.unwrap();
            settled += 1;

            assert_eq!(tracker.pending(), 3 - settled);
            assert_eq!(notified.load(Ordering::SeqCst), settled);
        }

        assert!(!tracker.is_busy());
    }

    #[test]
    fn test_spawn_without_runtime_settles_as_failure() {
        let (tracker, notified) = tracker_with_observer();

        let handle = tracker.spawn(async { Ok::<_, String>(()) });

        assert!(handle.is_none());
        assert!(!tracker.is_busy());
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_observer_sees_decremented_count() {
        let notifier = Arc::new(UpdateNotifier::new());
        let tracker = AsyncTaskTracker::new(notifier.clone());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let t = tracker.clone();
        let s = seen.clone();
        notifier.set_test_observer(move || {
            s.lock().unwrap().push(t.is_busy());
        });

        tracker.track(async { Ok::<_, String>(()) }).await;
        assert_eq!(*seen.lock().unwrap(), vec![false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_track_calls() {
        let (tracker, notified) = tracker_with_observer();

        let slow = tracker.track(async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Ok::<_, String>("slow")
        });
        let fast = tracker.track(async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Err::<&str, _>("fast failed".to_string())
        });

        let (slow, fast) = tokio::join!(slow, fast);
        assert_eq!(slow, Some("slow"));
        assert_eq!(fast, None);
        assert!(!tracker.is_busy());
        assert_eq!(notified.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dropped_future_still_settles() {
        let (tracker, notified) = tracker_with_observer();

        {
            let pending = tracker.track(std::future::pending::<Result<(), String>>());
            tokio::pin!(pending);
            // Poll once so the guard is taken, then drop the future.
            let _ = poll_once(pending.as_mut()).await;
            assert_eq!(tracker.pending(), 1);
        }

        assert_eq!(tracker.pending(), 0);
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    async fn poll_once<F: Future + Unpin>(fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            out = fut => Some(out),
            _ = std::future::ready(()) => None,
        }
    }
}
