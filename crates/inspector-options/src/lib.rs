//! # inspector-options: Coordination Core for the Options Panel
//!
//! This crate keeps the options panel consistent while the user edits
//! preferences and while requests to the org are in flight.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Options Core Architecture                        │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 SettingsModel (what the view reads)              │  │
//! │  │                                                                  │  │
//! │  │  Built once per panel from OptionsConfig + a KeyValueStore      │  │
//! │  │  Getters, validating setters, snapshot()                         │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │DebouncedSetting│  │AsyncTaskTracker│  │  UpdateNotifier        │    │
//! │  │                │  │                │  │                        │    │
//! │  │ One per key    │  │ Outstanding    │  │ One render callback    │    │
//! │  │ Abortable timer│  │ request count  │  │ One test observer      │    │
//! │  │ Last write wins│  │ (spinner)      │  │ Called once per update │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  EXTERNAL COLLABORATORS (traits only):                                 │
//! │  • KeyValueStore (inspector-store) - synchronous get/set               │
//! │  • MetadataSource - session service answering "who is logged in"      │
//! │  • The view - a render callback taking an optional `done` callback    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`model`] - `SettingsModel` and its builder
//! - [`debounce`] - `DebouncedSetting`, one store key with a debounce window
//! - [`tracker`] - `AsyncTaskTracker`, outstanding-operation count
//! - [`notifier`] - `UpdateNotifier`, render callback and test observer slots
//! - [`session`] - `MetadataSource` trait
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Options error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use inspector_options::{OptionsConfig, SettingsModel};
//! use inspector_store::JsonFileStore;
//!
//! let config = OptionsConfig::load_or_default(None);
//! let store = Arc::new(JsonFileStore::open_default()?);
//! let model = SettingsModel::from_config(&config, store)?;
//!
//! model.set_render_callback(|done| {
//!     // re-render from model.snapshot(), then:
//!     if let Some(done) = done { done(); }
//! });
//!
//! model.set(SettingKey::ArrowPosition, "45")?;  // persisted after 1000ms
//! model.shutdown()?;                             // or flushed now
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod debounce;
pub mod error;
pub mod model;
pub mod notifier;
pub mod session;
pub mod tracker;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::OptionsConfig;
pub use debounce::{DebouncedSetting, WriteMode};
pub use error::{OptionsError, OptionsResult};
pub use model::{SettingDef, SettingsModel, SettingsModelBuilder};
pub use notifier::{DoneCallback, RenderCallback, TestObserver, UpdateNotifier};
pub use session::MetadataSource;
pub use tracker::AsyncTaskTracker;
