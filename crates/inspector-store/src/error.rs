//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Backend failure (io::Error, quota, serde_json::Error)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the key and categorization            │
//! │       │                                                                 │
//! │       ├──► immediate write: returned to the setter's caller            │
//! │       └──► debounced write: logged, in-memory value stays              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Persistence errors.
///
/// None of these are retried. The in-memory value of the setting that
/// triggered them remains the source of truth for the session.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing the value would exceed the store's byte quota.
    ///
    /// ## When This Occurs
    /// - `MemoryStore::with_quota` and the new total is over the limit
    #[error("Quota exceeded writing '{key}': {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    /// The backing file could not be read or written.
    ///
    /// ## When This Occurs
    /// - Directory not writable
    /// - Disk full
    #[error("Storage I/O failed: {0}")]
    Io(String),

    /// The backing file is not a JSON object of strings.
    #[error("Storage file is corrupt: {0}")]
    Corrupt(String),

    /// The store was opened read-only.
    #[error("Store is read-only, cannot write '{key}'")]
    ReadOnly { key: String },

    /// No platform data directory could be determined.
    #[error("Could not determine a data directory for the store")]
    NoDataDir,
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_message() {
        let err = StoreError::QuotaExceeded {
            key: "popupArrowPosition".to_string(),
            needed: 30,
            quota: 16,
        };
        assert_eq!(
            err.to_string(),
            "Quota exceeded writing 'popupArrowPosition': 30 bytes needed, quota is 16"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
