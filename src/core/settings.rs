//! Startup configuration
//!
//! The host supplies settings once, when the dispatcher is initialized. Values
//! arrive as plain strings and integers; anything malformed is ignored and the
//! dispatcher keeps its previous defaults.

use super::error::{LoggerError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Source of startup configuration.
///
/// Every method has a neutral default so a provider only overrides what it
/// actually knows.
pub trait SettingsProvider {
    /// Comma-separated list of channels to mute, e.g. `"Physics, AI"`.
    fn muted_channels(&self) -> String {
        String::new()
    }

    /// Minimum level selector, see [`LogLevel::from_setting_index`](super::LogLevel::from_setting_index).
    fn min_log_level(&self) -> Option<i64> {
        None
    }

    fn enabled(&self) -> Option<bool> {
        None
    }

    /// Where the default file writer puts its files.
    fn log_directory(&self) -> Option<PathBuf> {
        None
    }
}

/// Plain settings record, loadable from JSON.
///
/// # Example
///
/// ```
/// use channel_logger::LoggerSettings;
///
/// let settings = LoggerSettings::from_json_str(
///     r#"{ "muted_channels": "Physics, AI", "min_log_level": 1 }"#,
/// ).unwrap();
/// assert_eq!(settings.min_log_level, 1);
/// assert!(settings.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    pub muted_channels: String,
    pub min_log_level: i64,
    pub enabled: bool,
    pub log_directory: Option<PathBuf>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            muted_channels: String::new(),
            min_log_level: 0,
            enabled: true,
            log_directory: None,
        }
    }
}

impl LoggerSettings {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_muted_channels(mut self, channels: impl Into<String>) -> Self {
        self.muted_channels = channels.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_min_log_level(mut self, index: i64) -> Self {
        self.min_log_level = index;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_log_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_directory = Some(dir.into());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger settings",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&content)
    }
}

impl SettingsProvider for LoggerSettings {
    fn muted_channels(&self) -> String {
        self.muted_channels.clone()
    }

    fn min_log_level(&self) -> Option<i64> {
        Some(self.min_log_level)
    }

    fn enabled(&self) -> Option<bool> {
        Some(self.enabled)
    }

    fn log_directory(&self) -> Option<PathBuf> {
        self.log_directory.clone()
    }
}

/// Split a comma-separated channel list, trimming each piece and skipping blanks.
pub fn parse_muted_channels(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|channel| !channel.is_empty())
        .map(String::from)
        .collect()
}
