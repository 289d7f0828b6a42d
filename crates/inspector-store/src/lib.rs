//! # inspector-store: Key-Value Storage for Inspector Options
//!
//! The options panel persists every preference as a string under a string
//! key, exactly like browser `localStorage`. This crate defines that contract
//! ([`KeyValueStore`]) and ships two backends.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Inspector Options Data Flow                         │
//! │                                                                         │
//! │  SettingsModel::set_arrow_position(45)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DebouncedSetting (inspector-options) ── waits 1000ms ──┐              │
//! │                                                          │              │
//! │  ┌───────────────────────────────────────────────────────▼─────────┐   │
//! │  │                 inspector-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │ KeyValueStore │    │  MemoryStore  │    │ JsonFileStore│   │   │
//! │  │   │   (trait)     │◄───│  + quota      │    │  atomic save │   │   │
//! │  │   │  get / set    │◄───┼───────────────┼────│              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ~/.local/share/inspector-options/options.json                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `KeyValueStore` trait
//! - [`memory`] - In-memory backend with optional quota
//! - [`file`] - JSON file backend
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust
//! use inspector_store::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! assert_eq!(store.get("apiVersion"), None);
//!
//! store.set("apiVersion", "61.0").unwrap();
//! assert_eq!(store.get("apiVersion").as_deref(), Some("61.0"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::KeyValueStore;
