//! # Options Configuration
//!
//! Configuration management for the options panel.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     INSPECTOR_HOST=acme.my.salesforce.com                              │
//! │     INSPECTOR_ARROW_DEBOUNCE_MS=500                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/options/options.toml (Linux)                             │
//! │     ~/Library/Application Support/com.inspector.options/options.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     1000ms arrow debounce, API version 61.0                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # options.toml
//! [panel]
//! host = "acme.my.salesforce.com"
//!
//! [storage]
//! path = "/var/lib/inspector/options.json"
//!
//! [preferences]
//! arrow_position_debounce_ms = 1000
//! default_arrow_orientation = "vertical"
//! default_arrow_position = 20
//! default_api_version = "61.0"
//!
//! [logging]
//! filter = "info,inspector=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use inspector_core::validation::validate_host;
use inspector_core::{ApiVersion, ArrowOrientation, ArrowPosition, ARROW_POSITION_DEBOUNCE_MS, DEFAULT_API_VERSION};

use crate::error::{OptionsError, OptionsResult};

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "options.toml";

/// Longest accepted debounce window.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

// =============================================================================
// Panel Settings
// =============================================================================

/// Which org the panel is opened for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSettings {
    /// Org host, e.g. `acme.my.salesforce.com`.
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_host() -> String {
    "login.salesforce.com".to_string()
}

impl Default for PanelSettings {
    fn default() -> Self {
        PanelSettings { host: default_host() }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the key-value store lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// JSON store file. `None` = platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Preference Settings
// =============================================================================

/// Debounce window and the defaults used when the store has no value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceSettings {
    /// Debounce window of the arrow position slider (milliseconds).
    #[serde(default = "default_arrow_debounce")]
    pub arrow_position_debounce_ms: u64,

    #[serde(default = "default_arrow_orientation")]
    pub default_arrow_orientation: String,

    #[serde(default = "default_arrow_position")]
    pub default_arrow_position: u8,

    #[serde(default = "default_api_version")]
    pub default_api_version: String,
}

fn default_arrow_debounce() -> u64 {
    ARROW_POSITION_DEBOUNCE_MS
}

fn default_arrow_orientation() -> String {
    ArrowOrientation::default().as_str().to_string()
}

fn default_arrow_position() -> u8 {
    ArrowPosition::default().percent()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl Default for PreferenceSettings {
    fn default() -> Self {
        PreferenceSettings {
            arrow_position_debounce_ms: default_arrow_debounce(),
            default_arrow_orientation: default_arrow_orientation(),
            default_arrow_position: default_arrow_position(),
            default_api_version: default_api_version(),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

/// Log filter used when `RUST_LOG` is not set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,inspector=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Options Configuration
// =============================================================================

/// Complete options configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionsConfig {
    #[serde(default)]
    pub panel: PanelSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub preferences: PreferenceSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl OptionsConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (options.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> OptionsResult<Self> {
        let config = Self::load_unvalidated(config_path)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`load`](Self::load), without the final [`validate`](Self::validate).
    ///
    /// For callers that layer their own overrides (command-line flags) on
    /// top and validate the result themselves.
    pub fn load_unvalidated(config_path: Option<PathBuf>) -> OptionsResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading options config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load options config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> OptionsResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| OptionsError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| OptionsError::ConfigSaveFailed(e.to_string()))?;
            }
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| OptionsError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Options config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OptionsResult<()> {
        validate_host(&self.panel.host)?;

        if self.preferences.arrow_position_debounce_ms > MAX_DEBOUNCE_MS {
            return Err(OptionsError::InvalidConfig(format!(
                "arrow_position_debounce_ms must be at most {}, got {}",
                MAX_DEBOUNCE_MS, self.preferences.arrow_position_debounce_ms
            )));
        }

        self.preferences
            .default_arrow_orientation
            .parse::<ArrowOrientation>()
            .map_err(|e| OptionsError::InvalidConfig(format!("default_arrow_orientation: {}", e)))?;

        ArrowPosition::new(self.preferences.default_arrow_position)
            .map_err(|e| OptionsError::InvalidConfig(format!("default_arrow_position: {}", e)))?;

        self.preferences
            .default_api_version
            .parse::<ApiVersion>()
            .map_err(|e| OptionsError::InvalidConfig(format!("default_api_version: {}", e)))?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("INSPECTOR_HOST") {
            debug!(host = %host, "Overriding host from environment");
            self.panel.host = host;
        }

        if let Ok(path) = std::env::var("INSPECTOR_STORE_PATH") {
            debug!(path = %path, "Overriding store path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Ok(ms) = std::env::var("INSPECTOR_ARROW_DEBOUNCE_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => self.preferences.arrow_position_debounce_ms = ms,
                Err(_) => warn!(value = %ms, "Ignoring non-numeric INSPECTOR_ARROW_DEBOUNCE_MS"),
            }
        }

        if let Ok(version) = std::env::var("INSPECTOR_API_VERSION") {
            self.preferences.default_api_version = version;
        }

        if let Ok(filter) = std::env::var("INSPECTOR_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "inspector", "options")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the org host.
    pub fn host(&self) -> &str {
        &self.panel.host
    }

    /// Debounce window of the arrow position slider.
    pub fn arrow_position_debounce(&self) -> Duration {
        Duration::from_millis(self.preferences.arrow_position_debounce_ms)
    }

    /// Default arrow orientation, falling back to the built-in default.
    pub fn default_arrow_orientation(&self) -> ArrowOrientation {
        self.preferences
            .default_arrow_orientation
            .parse()
            .unwrap_or_default()
    }

    /// Default arrow position, falling back to the built-in default.
    pub fn default_arrow_position(&self) -> ArrowPosition {
        ArrowPosition::new(self.preferences.default_arrow_position).unwrap_or_default()
    }

    /// Default API version, falling back to the built-in default.
    pub fn default_api_version(&self) -> ApiVersion {
        self.preferences.default_api_version.parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("inspector-config-{}", uuid::Uuid::new_v4()))
            .join(CONFIG_FILE_NAME)
    }

    #[test]
    fn test_default_config() {
        let config = OptionsConfig::default();
        assert_eq!(config.preferences.arrow_position_debounce_ms, 1000);
        assert_eq!(config.default_arrow_orientation(), ArrowOrientation::Vertical);
        assert_eq!(config.default_arrow_position().percent(), 20);
        assert_eq!(config.default_api_version().encode(), "61.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = OptionsConfig::default();

        config.preferences.arrow_position_debounce_ms = MAX_DEBOUNCE_MS + 1;
        assert!(config.validate().is_err());

        config.preferences.arrow_position_debounce_ms = 0;
        assert!(config.validate().is_ok());

        config.preferences.default_arrow_position = 101;
        assert!(config.validate().is_err());

        config.preferences.default_arrow_position = 50;
        config.preferences.default_api_version = "latest".to_string();
        assert!(config.validate().is_err());

        config.preferences.default_api_version = "60".to_string();
        config.preferences.default_arrow_orientation = "diagonal".to_string();
        assert!(config.validate().is_err());

        config.preferences.default_arrow_orientation = "horizontal".to_string();
        config.panel.host = "https://acme.my.salesforce.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: OptionsConfig = toml::from_str(
            r#"
            [panel]
            host = "acme.my.salesforce.com"

            [preferences]
            arrow_position_debounce_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.host(), "acme.my.salesforce.com");
        assert_eq!(config.arrow_position_debounce(), Duration::from_millis(250));
        assert_eq!(config.preferences.default_api_version, "61.0");
        assert_eq!(config.logging.filter, "info,inspector=debug");
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_config_path();
        let mut config = OptionsConfig::default();
        config.panel.host = "acme.my.salesforce.com".to_string();
        config.preferences.default_arrow_position = 65;

        let saved = config.save(Some(path.clone())).unwrap();
        assert_eq!(saved, path);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[panel]"));
        assert!(contents.contains("[preferences]"));

        let loaded: OptionsConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.host(), "acme.my.salesforce.com");
        assert_eq!(loaded.default_arrow_position().percent(), 65);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_malformed_file_is_load_error() {
        let path = temp_config_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[preferences\narrow_position_debounce_ms = ").unwrap();

        let err = OptionsConfig::load(Some(path.clone())).unwrap_err();
        assert!(matches!(err, OptionsError::ConfigLoadFailed(_)));

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
    #[test]
    fn test_unvalidated_load_leaves_validation_to_caller() {
        let path = temp_config_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[panel]\nhost = \"\"\n").unwrap();

        assert!(OptionsConfig::load(Some(path.clone())).is_err());

        let mut config = OptionsConfig::load_unvalidated(Some(path.clone())).unwrap();
        assert_eq!(config.panel.host, "");
        config.panel.host = "acme.my.salesforce.com".to_string();
        assert!(config.validate().is_ok());

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}

