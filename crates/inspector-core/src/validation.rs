//! # Validation Module
//!
//! Input validation for values that arrive as free text: the org host the
//! panel is opened for, and the API consumer key. Typed preferences validate
//! themselves through their `FromStr` impls in [`crate::types`].
//!
//! ## Usage
//! ```rust
//! use inspector_core::validation::{validate_api_key, validate_host};
//!
//! assert_eq!(validate_host("Acme.my.salesforce.com").unwrap(), "acme.my.salesforce.com");
//! assert_eq!(validate_api_key("  3MVG9 ").unwrap(), "3MVG9");
//! ```

use url::Url;

use crate::error::ValidationError;
use crate::MAX_API_KEY_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates an org host name and returns it lowercased.
///
/// ## Rules
/// - Must not be empty
/// - Bare host only: no scheme, port, path or query
pub fn validate_host(host: &str) -> ValidationResult<String> {
    let host = host.trim();

    if host.is_empty() {
        return Err(ValidationError::Required {
            field: "host".to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "host".to_string(),
        reason: reason.to_string(),
    };

    if host.contains("://") || host.contains('/') || host.contains('?') || host.contains('#') {
        return Err(invalid("expected a bare host name like acme.my.salesforce.com"));
    }

    let parsed = Url::parse(&format!("https://{}", host)).map_err(|e| invalid(&e.to_string()))?;

    if parsed.port().is_some() || !parsed.username().is_empty() {
        return Err(invalid("port and credentials are not allowed"));
    }

    match parsed.host_str() {
        Some(h) if h.eq_ignore_ascii_case(host) => Ok(h.to_string()),
        _ => Err(invalid("not a valid host name")),
    }
}

/// Validates an API consumer key and returns it trimmed.
///
/// ## Rules
/// - May be empty (clears the key)
/// - At most 255 characters
/// - No whitespace or control characters inside the key
pub fn validate_api_key(key: &str) -> ValidationResult<String> {
    let key = key.trim();

    if key.chars().count() > MAX_API_KEY_LEN {
        return Err(ValidationError::TooLong {
            field: "API consumer key".to_string(),
            max: MAX_API_KEY_LEN,
        });
    }

    if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidFormat {
            field: "API consumer key".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(key.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_host() {
        assert_eq!(validate_host("acme.my.salesforce.com").unwrap(), "acme.my.salesforce.com");
        assert_eq!(validate_host("  ACME.lightning.force.com ").unwrap(), "acme.lightning.force.com");
        assert!(validate_host("").is_err());
        assert!(validate_host("https://acme.my.salesforce.com").is_err());
        assert!(validate_host("acme.my.salesforce.com/home").is_err());
        assert!(validate_host("acme.my.salesforce.com:8443").is_err());
        assert!(validate_host("user@acme.my.salesforce.com").is_err());
    }

    #[test]
    fn test_validate_api_key() {
        assert_eq!(validate_api_key("").unwrap(), "");
        assert_eq!(validate_api_key(" 3MVG9xyz ").unwrap(), "3MVG9xyz");
        assert!(validate_api_key("3MVG9 xyz").is_err());
        assert!(validate_api_key(&"k".repeat(256)).is_err());
        assert!(validate_api_key(&"k".repeat(255)).is_ok());
    }
}
