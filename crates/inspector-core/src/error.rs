//! # Error Types
//!
//! Domain-specific error types for inspector-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  inspector-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  inspector-store errors (separate crate)                               │
//! │  └── StoreError       - Persistence failures (quota, I/O)              │
//! │                                                                         │
//! │  inspector-options errors                                              │
//! │  └── OptionsError     - What the model's callers see                   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → OptionsError → CliError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A setting name that the panel does not know.
    ///
    /// ## When This Occurs
    /// - CLI argument with a typo (`arow-position`)
    /// - Asking a model for a setting it was not built with
    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a value typed by the user cannot be encoded into the
/// fixed string form of its setting.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., non-numeric API version).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., a setting registered twice).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownSetting("arow-position".to_string());
        assert_eq!(err.to_string(), "Unknown setting: arow-position");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::OutOfRange {
            field: "arrow position".to_string(),
            min: 0,
            max: 100,
        };
        assert_eq!(err.to_string(), "arrow position must be between 0 and 100");

        let err = ValidationError::Required {
            field: "host".to_string(),
        };
        assert_eq!(err.to_string(), "host is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "host".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
