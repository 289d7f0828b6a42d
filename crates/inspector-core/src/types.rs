//! # Domain Types
//!
//! Preference types used throughout Inspector Options.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │ ArrowOrientation │  │  ArrowPosition   │  │   ApiVersion     │      │
//! │  │  ──────────────  │  │  ──────────────  │  │  ──────────────  │      │
//! │  │  Horizontal      │  │  0..=100 (%)     │  │  major (u16)     │      │
//! │  │  Vertical        │  │  "20"            │  │  "61.0"          │      │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘      │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │   SettingKey     │  │    UserInfo      │  │ SettingsSnapshot │      │
//! │  │  ──────────────  │  │  ──────────────  │  │  ──────────────  │      │
//! │  │  name + store    │  │  full name       │  │  what the view   │      │
//! │  │  key per host    │  │  user / org      │  │  renders from    │      │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## String Encodings
//! The host store only holds strings, so every typed value has exactly one
//! encoded form (`encode()`) and a tolerant parser (`FromStr`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::{DEFAULT_API_VERSION, USER_INFO_PLACEHOLDER};

// =============================================================================
// Arrow Orientation
// =============================================================================

/// Orientation of the popup arrow button injected into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ArrowOrientation {
    /// Button sits on the top edge.
    Horizontal,

    /// Button sits on the right edge.
    #[default]
    Vertical,
}

impl ArrowOrientation {
    /// Encoded store value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ArrowOrientation::Horizontal => "horizontal",
            ArrowOrientation::Vertical => "vertical",
        }
    }
}

impl fmt::Display for ArrowOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArrowOrientation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "horizontal" => Ok(ArrowOrientation::Horizontal),
            "vertical" => Ok(ArrowOrientation::Vertical),
            _ => Err(ValidationError::NotAllowed {
                field: "arrow orientation".to_string(),
                allowed: vec!["horizontal".to_string(), "vertical".to_string()],
            }),
        }
    }
}

// =============================================================================
// Arrow Position
// =============================================================================

/// Position of the popup arrow along its edge, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(try_from = "u8", into = "u8")]
#[ts(export)]
pub struct ArrowPosition(u8);

impl ArrowPosition {
    /// Highest allowed position.
    pub const MAX: u8 = 100;

    /// Creates a position, rejecting values above 100%.
    pub fn new(percent: u8) -> Result<Self, ValidationError> {
        if percent > Self::MAX {
            return Err(ValidationError::OutOfRange {
                field: "arrow position".to_string(),
                min: 0,
                max: Self::MAX as i64,
            });
        }
        Ok(ArrowPosition(percent))
    }

    /// Returns the position in percent.
    #[inline]
    pub const fn percent(&self) -> u8 {
        self.0
    }

    /// Encoded store value.
    pub fn encode(&self) -> String {
        self.0.to_string()
    }
}

impl Default for ArrowPosition {
    fn default() -> Self {
        ArrowPosition(20)
    }
}

impl fmt::Display for ArrowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArrowPosition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s.trim().parse().map_err(|_| ValidationError::InvalidFormat {
            field: "arrow position".to_string(),
            reason: format!("'{}' is not a whole number", s.trim()),
        })?;

        let percent = u8::try_from(raw).map_err(|_| ValidationError::OutOfRange {
            field: "arrow position".to_string(),
            min: 0,
            max: Self::MAX as i64,
        })?;

        ArrowPosition::new(percent)
    }
}

impl TryFrom<u8> for ArrowPosition {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ArrowPosition::new(value)
    }
}

impl From<ArrowPosition> for u8 {
    fn from(position: ArrowPosition) -> Self {
        position.0
    }
}

// =============================================================================
// API Version
// =============================================================================

/// Salesforce API version.
///
/// ## Encoding
/// The input box shows the bare major number (`61`), the store keeps it with
/// a `.0` suffix (`61.0`). Both forms parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApiVersion {
    major: u16,
}

impl ApiVersion {
    /// Highest major version accepted.
    pub const MAX_MAJOR: u16 = 999;

    /// Creates an API version from its major number.
    pub fn new(major: u16) -> Result<Self, ValidationError> {
        if major == 0 || major > Self::MAX_MAJOR {
            return Err(ValidationError::OutOfRange {
                field: "API version".to_string(),
                min: 1,
                max: Self::MAX_MAJOR as i64,
            });
        }
        Ok(ApiVersion { major })
    }

    /// Returns the major number.
    #[inline]
    pub const fn major(&self) -> u16 {
        self.major
    }

    /// Encoded store value (`"61.0"`).
    pub fn encode(&self) -> String {
        format!("{}.0", self.major)
    }

    /// Value shown in the input box (`"61"`).
    pub fn display_value(&self) -> String {
        self.major.to_string()
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        // DEFAULT_API_VERSION always parses
        DEFAULT_API_VERSION
            .parse()
            .unwrap_or(ApiVersion { major: 61 })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.0", self.major)
    }
}

impl FromStr for ApiVersion {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix(".0").unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(ValidationError::Required {
                field: "API version".to_string(),
            });
        }

        let major: u16 = digits.parse().map_err(|_| ValidationError::InvalidFormat {
            field: "API version".to_string(),
            reason: format!("expected a number like 61 or 61.0, got '{}'", trimmed),
        })?;

        ApiVersion::new(major)
    }
}

// =============================================================================
// Setting Keys
// =============================================================================

/// The preferences the options panel edits.
///
/// ## Store Keys
/// ```text
/// ┌───────────────────┬──────────────────────────┬────────────┐
/// │ Setting           │ Store key                │ Scope      │
/// ├───────────────────┼──────────────────────────┼────────────┤
/// │ ArrowOrientation  │ popupArrowOrientation    │ global     │
/// │ ArrowPosition     │ popupArrowPosition       │ global     │
/// │ ApiVersion        │ apiVersion               │ global     │
/// │ ApiKey            │ <host>_clientId          │ per org    │
/// └───────────────────┴──────────────────────────┴────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SettingKey {
    ArrowOrientation,
    ArrowPosition,
    ApiVersion,
    ApiKey,
}

impl SettingKey {
    /// Every setting, in panel order.
    pub const ALL: [SettingKey; 4] = [
        SettingKey::ArrowOrientation,
        SettingKey::ArrowPosition,
        SettingKey::ApiVersion,
        SettingKey::ApiKey,
    ];

    /// Command-line / serialized name.
    pub const fn name(&self) -> &'static str {
        match self {
            SettingKey::ArrowOrientation => "arrow-orientation",
            SettingKey::ArrowPosition => "arrow-position",
            SettingKey::ApiVersion => "api-version",
            SettingKey::ApiKey => "api-key",
        }
    }

    /// Label shown next to the control.
    pub const fn label(&self) -> &'static str {
        match self {
            SettingKey::ArrowOrientation => "Arrow button orientation",
            SettingKey::ArrowPosition => "Arrow button position (%)",
            SettingKey::ApiVersion => "API Version",
            SettingKey::ApiKey => "API Consumer Key",
        }
    }

    /// Returns true if the store key is prefixed with the org host.
    pub const fn is_host_scoped(&self) -> bool {
        matches!(self, SettingKey::ApiKey)
    }

    /// Key under which the value is persisted for the given org host.
    pub fn store_key(&self, host: &str) -> String {
        match self {
            SettingKey::ArrowOrientation => "popupArrowOrientation".to_string(),
            SettingKey::ArrowPosition => "popupArrowPosition".to_string(),
            SettingKey::ApiVersion => "apiVersion".to_string(),
            SettingKey::ApiKey => format!("{}_clientId", host),
        }
    }

    /// Validates user input and returns the encoded store value.
    pub fn normalize(&self, input: &str) -> Result<String, ValidationError> {
        match self {
            SettingKey::ArrowOrientation => Ok(input.parse::<ArrowOrientation>()?.as_str().to_string()),
            SettingKey::ArrowPosition => Ok(input.parse::<ArrowPosition>()?.encode()),
            SettingKey::ApiVersion => Ok(input.parse::<ApiVersion>()?.encode()),
            SettingKey::ApiKey => crate::validation::validate_api_key(input),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingKey {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        SettingKey::ALL
            .into_iter()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| crate::error::CoreError::UnknownSetting(s.to_string()))
    }
}

/// Read-only flag written by the extension when it detects a sandbox org.
pub fn sandbox_flag_key(host: &str) -> String {
    format!("{}_isSandbox", host)
}

/// Link back to the org's home page.
pub fn org_link(host: &str) -> String {
    format!("https://{}", host)
}

// =============================================================================
// User Info
// =============================================================================

/// Identity of the logged-in user, as returned by the session service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserInfo {
    pub full_name: String,
    pub user_name: String,
    pub organization_name: String,
}

impl UserInfo {
    /// Single line shown in the panel header.
    pub fn display_line(&self) -> String {
        format!(
            "{} / {} / {}",
            self.full_name, self.user_name, self.organization_name
        )
    }
}

// =============================================================================
// Settings Snapshot
// =============================================================================

/// Everything the view layer renders, captured at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SettingsSnapshot {
    /// Org host the panel was opened for.
    pub host: String,

    /// `https://<host>`
    pub org_link: String,

    /// False when the org is flagged as a sandbox.
    pub is_production: bool,

    /// `"..."` until loaded.
    pub user_info: String,

    /// True while any tracked operation is outstanding (spinner).
    pub is_busy: bool,

    pub arrow_orientation: ArrowOrientation,

    pub arrow_position: ArrowPosition,

    /// Bare major number, as shown in the input box.
    pub api_version: String,

    pub api_key: String,
}

impl SettingsSnapshot {
    /// Snapshot for a freshly opened panel with every preference at default.
    pub fn with_defaults(host: &str) -> Self {
        SettingsSnapshot {
            host: host.to_string(),
            org_link: org_link(host),
            is_production: true,
            user_info: USER_INFO_PLACEHOLDER.to_string(),
            is_busy: false,
            arrow_orientation: ArrowOrientation::default(),
            arrow_position: ArrowPosition::default(),
            api_version: ApiVersion::default().display_value(),
            api_key: String::new(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_orientation_parsing() {
        assert_eq!("horizontal".parse::<ArrowOrientation>().unwrap(), ArrowOrientation::Horizontal);
        assert_eq!(" Vertical ".parse::<ArrowOrientation>().unwrap(), ArrowOrientation::Vertical);
        assert!("diagonal".parse::<ArrowOrientation>().is_err());
        assert_eq!(ArrowOrientation::default().as_str(), "vertical");
    }

    #[test]
    fn test_arrow_position_bounds() {
        assert_eq!("0".parse::<ArrowPosition>().unwrap().percent(), 0);
        assert_eq!("100".parse::<ArrowPosition>().unwrap().percent(), 100);
        assert!("101".parse::<ArrowPosition>().is_err());
        assert!("-1".parse::<ArrowPosition>().is_err());
        assert!("abc".parse::<ArrowPosition>().is_err());
        assert_eq!(ArrowPosition::default().encode(), "20");
    }

    #[test]
    fn test_api_version_encoding() {
        let v: ApiVersion = "61".parse().unwrap();
        assert_eq!(v.encode(), "61.0");
        assert_eq!(v.display_value(), "61");

        let v: ApiVersion = "58.0".parse().unwrap();
        assert_eq!(v.major(), 58);

        assert!("".parse::<ApiVersion>().is_err());
        assert!("0".parse::<ApiVersion>().is_err());
        assert!("61.5".parse::<ApiVersion>().is_err());
        assert!("v61".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_default_api_version_constant_parses() {
        let parsed: ApiVersion = DEFAULT_API_VERSION.parse().unwrap();
        assert_eq!(ApiVersion::default(), parsed);
    }

    #[test]
    fn test_store_keys() {
        assert_eq!(SettingKey::ArrowPosition.store_key("acme.my.salesforce.com"), "popupArrowPosition");
        assert_eq!(
            SettingKey::ApiKey.store_key("acme.my.salesforce.com"),
            "acme.my.salesforce.com_clientId"
        );
        assert_eq!(sandbox_flag_key("acme.my.salesforce.com"), "acme.my.salesforce.com_isSandbox");
    }

    #[test]
    fn test_setting_key_parsing() {
        assert_eq!("api-version".parse::<SettingKey>().unwrap(), SettingKey::ApiVersion);
        assert_eq!("ARROW_POSITION".parse::<SettingKey>().unwrap(), SettingKey::ArrowPosition);
        assert!("arow-position".parse::<SettingKey>().is_err());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(SettingKey::ApiVersion.normalize("60").unwrap(), "60.0");
        assert_eq!(SettingKey::ArrowOrientation.normalize("HORIZONTAL").unwrap(), "horizontal");
        assert_eq!(SettingKey::ArrowPosition.normalize(" 07 ").unwrap(), "7");
        assert_eq!(SettingKey::ApiKey.normalize("  3MVG9abc  ").unwrap(), "3MVG9abc");
        assert!(SettingKey::ArrowPosition.normalize("200").is_err());
    }

    #[test]
    fn test_user_info_display_line() {
        let info = UserInfo {
            full_name: "Ada Lovelace".to_string(),
            user_name: "ada@example.com".to_string(),
            organization_name: "Analytical Engines".to_string(),
        };
        assert_eq!(info.display_line(), "Ada Lovelace / ada@example.com / Analytical Engines");
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let snapshot = SettingsSnapshot::with_defaults("acme.my.salesforce.com");
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["orgLink"], "https://acme.my.salesforce.com");
        assert_eq!(json["arrowOrientation"], "vertical");
        assert_eq!(json["arrowPosition"], 20);
        assert_eq!(json["apiVersion"], "61");
        assert_eq!(json["userInfo"], "...");
    }
}
