//! # In-Memory Store
//!
//! A `HashMap` behind a lock. Used by tests and as the backend of panels that
//! should not persist anything across runs.
//!
//! ## Quota
//! Browser storage rejects writes once an origin exceeds its quota. A quota
//! can be set here to reproduce that: the size of the store is the sum of
//! the byte lengths of all keys and values.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::store::KeyValueStore;

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,

    /// Maximum total size in bytes (keys + values). `None` = unlimited.
    quota: Option<usize>,
}

impl MemoryStore {
    /// Creates an empty, unlimited store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that rejects writes beyond `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        MemoryStore {
            entries: RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Creates a store pre-filled with the given entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MemoryStore {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            quota: None,
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted copy of all entries.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn size_with(entries: &HashMap<String, String>, key: &str, value: &str) -> usize {
        let current: usize = entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        current + key.len() + value.len()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(quota) = self.quota {
            let needed = Self::size_with(&entries, key, value);
            if needed > quota {
                warn!(key, needed, quota, "Memory store quota exceeded");
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
