//! # inspector-core: Pure Preference Types for Inspector Options
//!
//! This crate holds everything about the options panel that can be expressed
//! without I/O: the preference value types, their fixed string encodings,
//! the store keys they live under, and input validation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Inspector Options Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    View layer (renderer)                        │   │
//! │  │      Arrow slider ──► API version input ──► Consumer key        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ setters / render callback              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             inspector-options (SettingsModel)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ inspector-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ SettingKey │  │ UserInfo  │  │ validation│  │   │
//! │  │   │ ArrowPos  │  │ store keys │  │ Snapshot  │  │   rules   │  │   │
//! │  │   │ ApiVersion│  │            │  │           │  │           │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO TIMERS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Preference value types, setting keys, snapshot DTOs
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use inspector_core::types::{ApiVersion, ArrowPosition};
//!
//! // Values are always stored as strings
//! let version: ApiVersion = "61".parse().unwrap();
//! assert_eq!(version.encode(), "61.0");
//!
//! let position = ArrowPosition::new(45).unwrap();
//! assert_eq!(position.encode(), "45");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Debounce window applied to the arrow position slider.
///
/// Dragging the slider fires a change per step; only the value the user
/// settles on is persisted.
pub const ARROW_POSITION_DEBOUNCE_MS: u64 = 1000;

/// API version used when the store has none.
pub const DEFAULT_API_VERSION: &str = "61.0";

/// Placeholder shown until the user info has been loaded.
pub const USER_INFO_PLACEHOLDER: &str = "...";

/// Maximum length of an API consumer key.
pub const MAX_API_KEY_LEN: usize = 255;
