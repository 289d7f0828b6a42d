//! # Debounced Setting
//!
//! One store key plus an optional debounce window. Rapid successive writes
//! are coalesced into a single persisted write of the latest value.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    DebouncedSetting::write(value)                       │
//! │                                                                         │
//! │  lock state ──► in-memory value updated (read() sees it at once)       │
//! │     │                                                                   │
//! │     ├── Immediate / zero window ──► cancel pending ──► store.set()     │
//! │     │                                                                   │
//! │     └── Debounced                                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │    ┌──────────────┐   abort    ┌──────────────┐                        │
//! │    │ pending gen 1│ ─────────► │ pending gen 2│ ── sleep(window) ──┐   │
//! │    └──────────────┘            └──────────────┘                    │   │
//! │                                                                    ▼   │
//! │                            still gen 2 under lock? ──► store.set() │   │
//! │                                                                         │
//! │  Example (1000ms window):                                              │
//! │    t=0 "a"   t=200 "b"   t=400 "c"   ───►  t=1400 set("c")  (1 write)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The value and the pending write share one lock, and the store is written
//! while it is held, so concurrent writers always leave the store and
//! [`DebouncedSetting::read`] agreeing on the last value.
//!
//! The timer holds a weak reference to the setting. Dropping the setting
//! aborts a pending timer, so nothing is written after teardown; call
//! [`DebouncedSetting::flush`] first to keep the pending value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use inspector_store::{KeyValueStore, StoreResult};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

// =============================================================================
// Write Mode
// =============================================================================

/// How a single write is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Persist after the setting's debounce window.
    #[default]
    Debounced,

    /// Persist before `write` returns, dropping any pending write.
    Immediate,
}

// =============================================================================
// Pending Write
// =============================================================================

/// A write scheduled but not yet persisted.
#[derive(Debug)]
struct PendingWrite {
    generation: u64,
    value: String,
    timer: JoinHandle<()>,
}

/// In-memory value and the write waiting to persist it.
#[derive(Debug)]
struct State {
    value: String,
    pending: Option<PendingWrite>,
}

struct Inner {
    key: String,
    debounce: Duration,
    store: Arc<dyn KeyValueStore>,
    state: Mutex<State>,
    generation: AtomicU64,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, value: &str) -> StoreResult<()> {
        match self.store.set(&self.key, value) {
            Ok(()) => {
                debug!(key = %self.key, "Setting persisted");
                Ok(())
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to persist setting");
                Err(e)
            }
        }
    }

    /// Timer body: persists only if `generation` is still the pending one.
    fn fire(&self, generation: u64) {
        let mut state = self.state();
        let current = matches!(state.pending.as_ref(), Some(p) if p.generation == generation);
        if !current {
            debug!(key = %self.key, generation, "Superseded timer woke up, ignoring");
            return;
        }

        if let Some(write) = state.pending.take() {
            if let Err(e) = self.persist(&write.value) {
                error!(key = %self.key, error = %e, "Debounced write dropped");
            }
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let pending = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .take();
        if let Some(write) = pending {
            write.timer.abort();
            debug!(key = %self.key, "Pending write discarded on teardown");
        }
    }
}

// =============================================================================
// Debounced Setting
// =============================================================================

/// A single persisted setting with an optional debounce window.
pub struct DebouncedSetting {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for DebouncedSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedSetting")
            .field("key", &self.inner.key)
            .field("debounce", &self.inner.debounce)
            .field("value", &self.read())
            .field("pending", &self.has_pending())
            .finish()
    }
}

impl DebouncedSetting {
    /// Creates the setting, reading its current value from `store`.
    ///
    /// If the store has no value, `default` is used. The default is never
    /// written back just because it was read.
    pub fn new(
        key: impl Into<String>,
        default: impl Into<String>,
        debounce: Duration,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let key = key.into();
        let value = match store.get(&key) {
            Some(stored) => stored,
            None => {
                debug!(key = %key, "No stored value, using default");
                default.into()
            }
        };

        DebouncedSetting {
            inner: Arc::new(Inner {
                key,
                debounce,
                store,
                state: Mutex::new(State {
                    value,
                    pending: None,
                }),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Store key of this setting.
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Debounce window; zero means every write is immediate.
    pub fn debounce(&self) -> Duration {
        self.inner.debounce
    }

    /// Current in-memory value.
    pub fn read(&self) -> String {
        self.inner.state().value.clone()
    }

    /// Updates the value and schedules persistence.
    ///
    /// Returns the store error of a synchronous write. Errors of a debounced
    /// write are logged when its timer fires. In both cases the in-memory
    /// value keeps the new value.
    pub fn write(&self, value: impl Into<String>, mode: WriteMode) -> StoreResult<()> {
        let value = value.into();
        let mut state = self.inner.state();
        state.value = value.clone();

        if mode == WriteMode::Immediate || self.inner.debounce.is_zero() {
            return self.write_now(&mut state, &value);
        }

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(key = %self.inner.key, "No async runtime, persisting immediately");
                return self.write_now(&mut state, &value);
            }
        };

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let debounce = self.inner.debounce;

        if let Some(previous) = state.pending.take() {
            previous.timer.abort();
            debug!(key = %self.inner.key, superseded = previous.generation, "Pending write replaced");
        }

        let timer = handle.spawn(async move {
            tokio::time::sleep(debounce).await;
            if let Some(inner) = weak.upgrade() {
                inner.fire(generation);
            }
        });

        state.pending = Some(PendingWrite {
            generation,
            value,
            timer,
        });
        Ok(())
    }

    /// Persists a pending write now.
    ///
    /// Returns `Ok(true)` if there was one.
    pub fn flush(&self) -> StoreResult<bool> {
        let mut state = self.inner.state();
        match state.pending.take() {
            Some(write) => {
                write.timer.abort();
                self.inner.persist(&write.value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drops a pending write without persisting it.
    ///
    /// The in-memory value is left as is.
    pub fn cancel(&self) -> bool {
        match self.inner.state().pending.take() {
            Some(write) => {
                write.timer.abort();
                debug!(key = %self.inner.key, "Pending write cancelled");
                true
            }
            None => false,
        }
    }

    /// Returns true while a debounced write is waiting for its timer.
    pub fn has_pending(&self) -> bool {
        self.inner.state().pending.is_some()
    }

    fn write_now(&self, state: &mut State, value: &str) -> StoreResult<()> {
        if let Some(previous) = state.pending.take() {
            previous.timer.abort();
        }
        self.inner.persist(value)
    }
}
