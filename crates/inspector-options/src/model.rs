//! # Settings Model
//!
//! The observable state of the options panel: current preference values,
//! the busy flag, and the org context the panel was opened for.
//!
//! ## Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          SettingsModel                                  │
//! │                                                                         │
//! │  View layer                                                            │
//! │     │ set(key, input)                  │ load_user_info(source)        │
//! │     ▼                                  ▼                               │
//! │  normalize ── invalid ──► Err     AsyncTaskTracker ── count ──┐        │
//! │     │          (no write, no notify)   │                       │        │
//! │     ▼                                  │ settles               │        │
//! │  DebouncedSetting.write()              │                       │        │
//! │     │                                  ▼                       │        │
//! │     └────────────► UpdateNotifier.notify() ◄───────────────────┘        │
//! │                         │                                               │
//! │                         ▼                                               │
//! │                 render callback (snapshot) + test observer              │
//! │                                                                         │
//! │  Setters never go through the tracker; only calls into an external     │
//! │  source do.                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use inspector_core::validation::validate_host;
use inspector_core::{
    org_link, sandbox_flag_key, ApiVersion, ArrowOrientation, ArrowPosition, SettingKey,
    SettingsSnapshot, ValidationError, USER_INFO_PLACEHOLDER,
};
use inspector_store::KeyValueStore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::OptionsConfig;
use crate::debounce::{DebouncedSetting, WriteMode};
use crate::error::{OptionsError, OptionsResult};
use crate::notifier::{DoneCallback, UpdateNotifier};
use crate::session::MetadataSource;
use crate::tracker::AsyncTaskTracker;

// =============================================================================
// Setting Registration
// =============================================================================

/// How one setting is registered with the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingDef {
    pub key: SettingKey,

    /// Value used while the store has none. Validated at build time.
    pub default: String,

    /// Zero persists every write immediately.
    pub debounce: Duration,
}

impl SettingDef {
    pub fn new(key: SettingKey, default: impl Into<String>, debounce: Duration) -> Self {
        SettingDef {
            key,
            default: default.into(),
            debounce,
        }
    }

    /// The four panel preferences, with defaults and debounce from `config`.
    pub fn standard(config: &OptionsConfig) -> Vec<SettingDef> {
        vec![
            SettingDef::new(
                SettingKey::ArrowOrientation,
                config.default_arrow_orientation().as_str(),
                Duration::ZERO,
            ),
            SettingDef::new(
                SettingKey::ArrowPosition,
                config.default_arrow_position().encode(),
                config.arrow_position_debounce(),
            ),
            SettingDef::new(
                SettingKey::ApiVersion,
                config.default_api_version().encode(),
                Duration::ZERO,
            ),
            SettingDef::new(SettingKey::ApiKey, "", Duration::ZERO),
        ]
    }
}

#[derive(Debug)]
struct Entry {
    setting: DebouncedSetting,
    default: String,
}

// =============================================================================
// Settings Model
// =============================================================================

/// Current settings plus busy state, observable through an [`UpdateNotifier`].
pub struct SettingsModel {
    host: String,
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<UpdateNotifier>,
    tracker: AsyncTaskTracker,
    settings: HashMap<SettingKey, Entry>,
    user_info: Arc<RwLock<String>>,
}

impl std::fmt::Debug for SettingsModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsModel")
            .field("host", &self.host)
            .field("tracker", &self.tracker)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SettingsModel {
    /// Returns a builder for a panel opened for `host`.
    pub fn builder(host: impl Into<String>) -> SettingsModelBuilder {
        SettingsModelBuilder::new(host)
    }

    /// Builds the standard panel described by `config` on top of `store`.
    pub fn from_config(config: &OptionsConfig, store: Arc<dyn KeyValueStore>) -> OptionsResult<Self> {
        SettingsModelBuilder::new(config.host())
            .with_store(store)
            .with_settings(SettingDef::standard(config))
            .build()
    }

    // =========================================================================
    // Org Context
    // =========================================================================

    /// Org host, normalized.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// `https://<host>`
    pub fn org_link(&self) -> String {
        org_link(&self.host)
    }

    /// False only if the store flags this org as a sandbox.
    pub fn is_production(&self) -> bool {
        self.store.get(&sandbox_flag_key(&self.host)).as_deref() != Some("true")
    }

    /// `"..."` until user info has been loaded.
    pub fn user_info(&self) -> String {
        self.user_info
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // =========================================================================
    // Raw Access
    // =========================================================================

    /// Keys of the registered settings, in panel order.
    pub fn keys(&self) -> Vec<SettingKey> {
        SettingKey::ALL
            .into_iter()
            .filter(|key| self.settings.contains_key(key))
            .collect()
    }

    /// Store key a setting is persisted under.
    pub fn store_key(&self, key: SettingKey) -> OptionsResult<&str> {
        Ok(self.entry(key)?.setting.key())
    }

    /// Current in-memory string value of a setting.
    pub fn get(&self, key: SettingKey) -> OptionsResult<String> {
        Ok(self.entry(key)?.setting.read())
    }

    /// Validates `input` and writes it with the setting's own debounce.
    pub fn set(&self, key: SettingKey, input: &str) -> OptionsResult<()> {
        self.set_with_mode(key, input, WriteMode::Debounced)
    }

    /// Validates `input` and writes it.
    ///
    /// Invalid input changes nothing and notifies nothing. Otherwise the
    /// in-memory value is updated and exactly one notification is sent, even
    /// if persisting failed; the store error is then returned.
    pub fn set_with_mode(&self, key: SettingKey, input: &str, mode: WriteMode) -> OptionsResult<()> {
        let entry = self.entry(key)?;
        let value = key.normalize(input).map_err(|e| {
            debug!(setting = %key, error = %e, "Rejected setting input");
            e
        })?;

        let persisted = entry.setting.write(value, mode);
        self.notifier.notify(None);

        persisted.map_err(|e| {
            warn!(setting = %key, error = %e, "Setting kept in memory only");
            OptionsError::Store(e)
        })
    }

    // =========================================================================
    // Typed Preferences
    // =========================================================================

    pub fn arrow_orientation(&self) -> ArrowOrientation {
        self.decode(SettingKey::ArrowOrientation)
    }

    pub fn set_arrow_orientation(&self, orientation: ArrowOrientation) -> OptionsResult<()> {
        self.set(SettingKey::ArrowOrientation, orientation.as_str())
    }

    pub fn arrow_position(&self) -> ArrowPosition {
        self.decode(SettingKey::ArrowPosition)
    }

    /// Debounced: dragging the slider persists only where it stops.
    pub fn set_arrow_position(&self, position: ArrowPosition) -> OptionsResult<()> {
        self.set(SettingKey::ArrowPosition, &position.encode())
    }

    pub fn api_version(&self) -> ApiVersion {
        self.decode(SettingKey::ApiVersion)
    }

    pub fn set_api_version(&self, version: ApiVersion) -> OptionsResult<()> {
        self.set(SettingKey::ApiVersion, &version.encode())
    }

    /// API consumer key of this org; empty if none.
    pub fn api_key(&self) -> String {
        self.get(SettingKey::ApiKey).unwrap_or_default()
    }

    pub fn set_api_key(&self, key: &str) -> OptionsResult<()> {
        self.set(SettingKey::ApiKey, key)
    }

    // =========================================================================
    // Busy State & Tracked Operations
    // =========================================================================

    /// True while any tracked operation is outstanding.
    pub fn is_busy(&self) -> bool {
        self.tracker.is_busy()
    }

    /// The tracker shared with this model.
    pub fn tracker(&self) -> &AsyncTaskTracker {
        &self.tracker
    }

    /// Awaits `operation` as a tracked operation. See [`AsyncTaskTracker::track`].
    pub async fn run_tracked<F, T, E>(&self, operation: F) -> Option<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.tracker.track(operation).await
    }

    /// Spawns `operation` as a tracked background task.
    ///
    /// `None` when no tokio runtime is running. See [`AsyncTaskTracker::spawn`].
    pub fn spawn_tracked<F, T, E>(&self, operation: F) -> Option<JoinHandle<Option<T>>>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        self.tracker.spawn(operation)
    }

    /// Fetches the user info line through the tracker.
    ///
    /// Returns false if the request failed; the placeholder stays.
    pub async fn load_user_info<S: MetadataSource>(&self, source: &S) -> bool {
        let user_info = self.user_info.clone();
        self.run_tracked(async move {
            let info = source.get_user_info().await?;
            Self::store_user_info(&user_info, info.display_line());
            Ok::<_, OptionsError>(())
        })
        .await
        .is_some()
    }

    /// Like [`load_user_info`](Self::load_user_info), in the background.
    ///
    /// The model is busy as soon as this returns.
    pub fn spawn_load_user_info<S: MetadataSource>(
        &self,
        source: Arc<S>,
    ) -> Option<JoinHandle<Option<()>>> {
        let user_info = self.user_info.clone();
        self.spawn_tracked(async move {
            let info = source.get_user_info().await?;
            Self::store_user_info(&user_info, info.display_line());
            Ok::<_, OptionsError>(())
        })
    }

    fn store_user_info(slot: &RwLock<String>, line: String) {
        debug!(user_info = %line, "User info loaded");
        *slot.write().unwrap_or_else(PoisonError::into_inner) = line;
    }

    // =========================================================================
    // Notification
    // =========================================================================

    /// The notifier shared with the tracker.
    pub fn notifier(&self) -> &Arc<UpdateNotifier> {
        &self.notifier
    }

    /// Registers the render callback, replacing any previous one.
    pub fn set_render_callback<F>(&self, callback: F)
    where
        F: Fn(Option<DoneCallback>) + Send + Sync + 'static,
    {
        self.notifier.set_render_callback(callback);
    }

    /// Registers the test observer, replacing any previous one.
    pub fn set_test_observer<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notifier.set_test_observer(callback);
    }

    /// Signals one logical update that happened outside the setters.
    pub fn did_update(&self, done: Option<DoneCallback>) {
        self.notifier.notify(done);
    }

    /// Everything the view renders, read at one point in time.
    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            host: self.host.clone(),
            org_link: self.org_link(),
            is_production: self.is_production(),
            user_info: self.user_info(),
            is_busy: self.is_busy(),
            arrow_orientation: self.arrow_orientation(),
            arrow_position: self.arrow_position(),
            api_version: self.api_version().display_value(),
            api_key: self.api_key(),
        }
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Returns true if any setting has a debounced write waiting.
    pub fn has_pending_writes(&self) -> bool {
        self.settings.values().any(|entry| entry.setting.has_pending())
    }

    /// Persists every pending write now.
    ///
    /// Every pending write is attempted; the first store error is returned
    /// after the rest have been flushed. Returns the number persisted.
    pub fn flush_pending(&self) -> OptionsResult<usize> {
        let mut flushed = 0;
        let mut first_error = None;

        for key in SettingKey::ALL {
            let Some(entry) = self.settings.get(&key) else {
                continue;
            };
            match entry.setting.flush() {
                Ok(true) => flushed += 1,
                Ok(false) => {}
                Err(e) => {
                    error!(setting = %key, error = %e, "Failed to flush pending write");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(OptionsError::Store(e)),
            None => Ok(flushed),
        }
    }

    /// Flushes pending writes and detaches the view.
    pub fn shutdown(&self) -> OptionsResult<usize> {
        let flushed = self.flush_pending();
        self.notifier.clear_render_callback();
        info!(host = %self.host, flushed = ?flushed.as_ref().ok(), "Settings model shut down");
        flushed
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn entry(&self, key: SettingKey) -> OptionsResult<&Entry> {
        self.settings.get(&key).ok_or(OptionsError::NotRegistered(key))
    }

    /// Stored value, else configured default, else the type's default.
    fn decode<T>(&self, key: SettingKey) -> T
    where
        T: FromStr + Default,
        T::Err: Display,
    {
        let Some(entry) = self.settings.get(&key) else {
            return T::default();
        };

        let raw = entry.setting.read();
        match raw.parse() {
            Ok(value) => value,
            Err(e) => {
                warn!(setting = %key, value = %raw, error = %e, "Undecodable value, using default");
                entry.default.parse().unwrap_or_default()
            }
        }
    }
}

// =============================================================================
// Builder Pattern
// =============================================================================

/// Builder for creating a SettingsModel with options.
pub struct SettingsModelBuilder {
    host: String,
    store: Option<Arc<dyn KeyValueStore>>,
    notifier: Option<Arc<UpdateNotifier>>,
    defs: Vec<SettingDef>,
}

impl SettingsModelBuilder {
    /// Creates a builder for a panel opened for `host`.
    pub fn new(host: impl Into<String>) -> Self {
        SettingsModelBuilder {
            host: host.into(),
            store: None,
            notifier: None,
            defs: Vec::new(),
        }
    }

    /// Sets the key-value store.
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Shares an existing notifier instead of creating one.
    pub fn with_notifier(mut self, notifier: Arc<UpdateNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Registers one setting.
    pub fn with_setting(mut self, key: SettingKey, default: impl Into<String>, debounce: Duration) -> Self {
        self.defs.push(SettingDef::new(key, default, debounce));
        self
    }

    /// Registers several settings.
    pub fn with_settings(mut self, defs: impl IntoIterator<Item = SettingDef>) -> Self {
        self.defs.extend(defs);
        self
    }

    /// Builds the model, reading every setting's current value from the store.
    pub fn build(self) -> OptionsResult<SettingsModel> {
        let host = validate_host(&self.host)?;

        let store = self
            .store
            .ok_or_else(|| OptionsError::InvalidConfig("Key-value store required".into()))?;

        let notifier = self.notifier.unwrap_or_else(|| Arc::new(UpdateNotifier::new()));
        let tracker = AsyncTaskTracker::new(notifier.clone());

        let mut settings = HashMap::with_capacity(self.defs.len());
        for def in self.defs {
            if settings.contains_key(&def.key) {
                return Err(ValidationError::Duplicate {
                    field: "setting".to_string(),
                    value: def.key.name().to_string(),
                }
                .into());
            }

            let default = def.key.normalize(&def.default)?;
            let setting = DebouncedSetting::new(
                def.key.store_key(&host),
                default.clone(),
                def.debounce,
                store.clone(),
            );
            settings.insert(def.key, Entry { setting, default });
        }

        info!(host = %host, settings = settings.len(), "Settings model ready");

        Ok(SettingsModel {
            host,
            store,
            notifier,
            tracker,
            settings,
            user_info: Arc::new(RwLock::new(USER_INFO_PLACEHOLDER.to_string())),
        })
    }
}
