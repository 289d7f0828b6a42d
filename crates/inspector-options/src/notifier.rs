//! # Update Notifier
//!
//! The single "state changed, please re-render" signal of the panel.
//!
//! ## Slots
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         UpdateNotifier                                  │
//! │                                                                         │
//! │  notify(done)                                                           │
//! │     │                                                                   │
//! │     ├──► render slot   (0..1)  cb(done)   view re-renders, calls done   │
//! │     │                          (no slot: done is dropped, never called) │
//! │     │                                                                   │
//! │     └──► observer slot (0..1)  cb()       tests count updates           │
//! │                                                                         │
//! │  Registering replaces the slot's previous callback.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers emit exactly one notification per logical update: event handlers
//! after they mutate the model, the tracker after an operation settles.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{error, trace};

/// Called by the view once a render pass has been applied.
pub type DoneCallback = Box<dyn FnOnce() + Send + 'static>;

/// Re-renders the view from current model state.
pub type RenderCallback = Arc<dyn Fn(Option<DoneCallback>) + Send + Sync + 'static>;

/// Instrumentation hook, invoked synchronously on every update.
pub type TestObserver = Arc<dyn Fn() + Send + Sync + 'static>;

/// Holds at most one render callback and one test observer.
#[derive(Default)]
pub struct UpdateNotifier {
    render: RwLock<Option<RenderCallback>>,
    observer: RwLock<Option<TestObserver>>,
}

impl UpdateNotifier {
    /// Creates a notifier with both slots empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the render callback, replacing any previous one.
    pub fn set_render_callback<F>(&self, callback: F)
    where
        F: Fn(Option<DoneCallback>) + Send + Sync + 'static,
    {
        *self.render.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));
    }

    /// Registers the test observer, replacing any previous one.
    pub fn set_test_observer<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.observer.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));
    }

    /// Empties the render slot.
    pub fn clear_render_callback(&self) {
        self.render.write().unwrap_or_else(PoisonError::into_inner).take();
    }

    /// Empties the observer slot.
    pub fn clear_test_observer(&self) {
        self.observer.write().unwrap_or_else(PoisonError::into_inner).take();
    }

    /// Returns true if a render callback is registered.
    pub fn has_render_callback(&self) -> bool {
        self.render.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Emits one notification.
    ///
    /// `done` is handed to the render callback. Without a render callback it
    /// is dropped and never invoked. A panicking callback is logged and
    /// does not propagate.
    pub fn notify(&self, done: Option<DoneCallback>) {
        // Clone out of the slots so callbacks may touch the notifier.
        let render = self.render.read().unwrap_or_else(PoisonError::into_inner).clone();
        let observer = self.observer.read().unwrap_or_else(PoisonError::into_inner).clone();

        trace!(
            render = render.is_some(),
            observer = observer.is_some(),
            "Notifying update"
        );

        if let Some(render) = render {
            if catch_unwind(AssertUnwindSafe(|| render(done))).is_err() {
                error!("Render callback panicked");
            }
        }

        if let Some(observer) = observer {
            if catch_unwind(AssertUnwindSafe(|| observer())).is_err() {
                error!("Test observer panicked");
            }
        }
    }
}

impl std::fmt::Debug for UpdateNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let observer = self.observer.read().unwrap_or_else(PoisonError::into_inner).is_some();
        f.debug_struct("UpdateNotifier")
            .field("render", &self.has_render_callback())
            .field("observer", &observer)
            .finish()
    }
}
