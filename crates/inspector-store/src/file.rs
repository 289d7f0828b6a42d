//! # JSON File Store
//!
//! Persists all entries as one JSON object of strings.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        JsonFileStore::set                               │
//! │                                                                         │
//! │  1. Lock entries                                                        │
//! │  2. Serialize entries + new value  ──► options.json.tmp                 │
//! │  3. rename(options.json.tmp, options.json)   (atomic replace)           │
//! │  4. Commit new value in memory                                          │
//! │                                                                         │
//! │  Any failure in 2–3 leaves both the file and memory unchanged.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Platform-Specific Paths
//! - **macOS**: `~/Library/Application Support/com.inspector.options/options.json`
//! - **Windows**: `%APPDATA%\inspector\options\data\options.json`
//! - **Linux**: `~/.local/share/options/options.json`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use directories::ProjectDirs;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::KeyValueStore;

/// File name of the default store.
pub const STORE_FILE_NAME: &str = "options.json";

/// Key-value store backed by a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
    read_only: bool,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open_with(path.into(), false)
    }

    /// Opens the store at `path`; every `set` fails with `ReadOnly`.
    pub fn open_read_only(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open_with(path.into(), true)
    }

    /// Opens the store in the platform data directory.
    pub fn open_default() -> StoreResult<Self> {
        let path = Self::default_path().ok_or(StoreError::NoDataDir)?;
        Self::open(path)
    }

    /// Returns the default store path, if a data directory exists.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "inspector", "options")
            .map(|dirs| dirs.data_dir().join(STORE_FILE_NAME))
    }

    fn open_with(path: PathBuf, read_only: bool) -> StoreResult<Self> {
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str::<BTreeMap<String, String>>(&contents)?
            }
        } else {
            debug!(?path, "Store file not found, starting empty");
            BTreeMap::new()
        };

        info!(?path, entries = entries.len(), read_only, "Opened JSON store");

        Ok(JsonFileStore {
            path,
            entries: RwLock::new(entries),
            read_only,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sorted copy of all entries.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write_file(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly {
                key: key.to_string(),
            });
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.write_file(&next)?;
        *entries = next;

        debug!(key, path = ?self.path, "Persisted value");
        Ok(())
    }
}
