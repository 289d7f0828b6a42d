//! Test doubles shared by the unit tests of this crate.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use inspector_core::UserInfo;
use inspector_store::{KeyValueStore, MemoryStore, StoreError, StoreResult};

use crate::error::{OptionsError, OptionsResult};
use crate::session::MetadataSource;

/// Memory store that records every `set` call in order.
#[derive(Debug, Default)]
pub(crate) struct RecordingStore {
    inner: MemoryStore,
    writes: Mutex<Vec<(String, String)>>,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        RecordingStore {
            inner: MemoryStore::with_entries(entries),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn write_count(&self) -> usize {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl KeyValueStore for RecordingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((key.to_string(), value.to_string()));
        self.inner.set(key, value)
    }
}

/// Store whose reads work but every write is rejected.
#[derive(Debug, Default)]
pub(crate) struct FailingStore {
    inner: MemoryStore,
}

impl FailingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        Err(StoreError::QuotaExceeded {
            key: key.to_string(),
            needed: key.len() + value.len(),
            quota: 0,
        })
    }
}

/// Session service answering after a fixed delay.
#[derive(Debug, Clone)]
pub(crate) struct StaticMetadataSource {
    result: Result<UserInfo, String>,
    delay: Duration,
}

impl StaticMetadataSource {
    pub(crate) fn ok(info: UserInfo) -> Self {
        StaticMetadataSource {
            result: Ok(info),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        StaticMetadataSource {
            result: Err(message.to_string()),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl MetadataSource for StaticMetadataSource {
    async fn get_user_info(&self) -> OptionsResult<UserInfo> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone().map_err(OptionsError::Metadata)
    }
}

pub(crate) fn sample_user() -> UserInfo {
    UserInfo {
        full_name: "Ada Lovelace".to_string(),
        user_name: "ada@example.com".to_string(),
        organization_name: "Analytical Engines".to_string(),
    }
}
