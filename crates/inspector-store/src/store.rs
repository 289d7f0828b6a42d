//! # KeyValueStore Trait
//!
//! The synchronous storage contract the options core consumes.

use std::sync::Arc;

use crate::error::StoreResult;

/// Synchronous string key-value storage.
///
/// Implementations must be shareable across tasks: debounced writes are
/// flushed from a timer task while the panel keeps reading on its own task.
///
/// ## Contract
/// - `get` never fails; a missing key is `None`
/// - `set` may fail (quota, I/O); a failed `set` leaves the previous value
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}
