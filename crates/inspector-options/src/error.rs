//! # Options Error Types
//!
//! Error types for the coordination core.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Options Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Persistence   │  │     Input               │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Store          │  │  Core (validation,      │ │
//! │  │  ConfigLoad     │  │  (quota, I/O)   │  │  unknown setting)       │ │
//! │  │  ConfigSave     │  │                 │  │  NotRegistered          │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Tracked-operation failures (Metadata) are logged by the tracker and   │
//! │  never reach the caller of run_tracked.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use inspector_core::{CoreError, SettingKey, ValidationError};
use inspector_store::StoreError;
use thiserror::Error;

/// Result type alias for options operations.
pub type OptionsResult<T> = Result<T, OptionsError>;

/// Error type covering everything a caller of the options core can see.
#[derive(Debug, Error)]
pub enum OptionsError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid options configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Persistence Errors
    // =========================================================================
    /// The store rejected a write. The in-memory value was kept.
    #[error("Failed to persist setting: {0}")]
    Store(#[from] StoreError),

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Unknown setting name or invalid value.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The model was built without this setting.
    #[error("Setting '{0}' is not registered in this panel")]
    NotRegistered(SettingKey),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// The session / metadata service failed.
    #[error("Metadata request failed: {0}")]
    Metadata(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for OptionsError {
    fn from(err: ValidationError) -> Self {
        OptionsError::Core(CoreError::Validation(err))
    }
}

impl From<std::io::Error> for OptionsError {
    fn from(err: std::io::Error) -> Self {
        OptionsError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for OptionsError {
    fn from(err: toml::de::Error) -> Self {
        OptionsError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for OptionsError {
    fn from(err: toml::ser::Error) -> Self {
        OptionsError::ConfigSaveFailed(err.to_string())
    }
}

impl OptionsError {
    /// Returns true if the error came from user input rather than the
    /// environment, so the panel can show it next to the control.
    pub fn is_input_error(&self) -> bool {
        matches!(self, OptionsError::Core(_) | OptionsError::NotRegistered(_))
    }
}
