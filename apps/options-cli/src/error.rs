//! # CLI Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the CLI                                │
//! │                                                                         │
//! │  inspector-options set arrow-position 150                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  execute()  Result<String, CliError>                             │  │
//! │  │         │                                                        │  │
//! │  │  Store error? ──── StoreError::QuotaExceeded ────┐               │  │
//! │  │         │                                        ▼               │  │
//! │  │  Bad input? ────── ValidationError ────────── CliError ────────► │  │
//! │  │         │                                                        │  │
//! │  │  Success ──► stdout                       stderr (JSON) + exit ◄ │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use inspector_core::CoreError;
use inspector_options::OptionsError;
use inspector_store::StoreError;
use serde::Serialize;

/// Error printed when a command fails.
///
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Validation error: arrow position must be between 0 and 100"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for CLI failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Setting name not known or not registered
    UnknownSetting,

    /// Store read/write failed
    StorageError,

    /// Configuration could not be loaded or saved
    ConfigError,

    /// Anything else
    Internal,
}

impl CliError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }

    /// Process exit code: 2 for bad input, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self.code {
            ErrorCode::ValidationError | ErrorCode::UnknownSetting => 2,
            _ => 1,
        }
    }

    /// JSON rendering for stderr.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"message\":{:?}}}", self.message))
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        CliError::new(ErrorCode::StorageError, err.to_string())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownSetting(name) => {
                CliError::new(ErrorCode::UnknownSetting, format!("Unknown setting: {}", name))
            }
            CoreError::Validation(e) => CliError::new(ErrorCode::ValidationError, e.to_string()),
        }
    }
}

impl From<OptionsError> for CliError {
    fn from(err: OptionsError) -> Self {
        match err {
            OptionsError::Core(e) => e.into(),
            OptionsError::Store(e) => e.into(),
            OptionsError::NotRegistered(key) => CliError::new(
                ErrorCode::UnknownSetting,
                format!("Setting '{}' is not available", key),
            ),
            e @ (OptionsError::InvalidConfig(_)
            | OptionsError::ConfigLoadFailed(_)
            | OptionsError::ConfigSaveFailed(_)) => CliError::new(ErrorCode::ConfigError, e.to_string()),
            OptionsError::Metadata(e) => {
                tracing::error!("Metadata request failed: {}", e);
                CliError::internal("Metadata request failed")
            }
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("Failed to render output: {}", err))
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;
    use inspector_core::ValidationError;

    #[test]
    fn test_validation_maps_to_exit_2() {
        let err: CliError = OptionsError::from(ValidationError::Required {
            field: "host".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_store_error_serializes() {
        let err: CliError = OptionsError::Store(StoreError::ReadOnly {
            key: "apiVersion".to_string(),
        })
        .into();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_json().starts_with("{\"code\":\"STORAGE_ERROR\""));
    }
}
