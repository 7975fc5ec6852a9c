//! Operator settings loaded from `~/.formcore/settings.toml`.
//!
//! The file is optional; if it does not exist all fields fall back to their
//! `Default` values. The admin surface that edits these values lives in the
//! host; this module is the persistence object it reads and writes.

use crate::utils::formcore_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Fixed settings file name under the formcore data directory.
pub const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Operator-supplied settings: log-forwarding toggle plus the two aggregator
/// credentials, and the local file-logging toggle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Log aggregator intake URL.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Log aggregator API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Forward log lines to the aggregator.
    #[serde(default)]
    pub send_logs: bool,
    /// Also write log lines to the local log file.
    #[serde(default = "default_log_to_file")]
    pub log_to_file: bool,
}

fn default_log_to_file() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            send_logs: false,
            log_to_file: default_log_to_file(),
        }
    }
}

impl Settings {
    /// Whether forwarding is enabled and both credentials are present.
    #[must_use]
    pub fn telemetry_ready(&self) -> bool {
        self.send_logs
            && self.api_url.as_deref().is_some_and(|s| !s.is_empty())
            && self.api_key.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Canonical settings file path (`~/.formcore/settings.toml`).
#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    formcore_dir().map(|dir| dir.join(SETTINGS_FILE))
}

/// Load settings from the canonical path.
///
/// Returns `Ok(Settings::default())` if the file does not exist so callers
/// never need to handle the "absent file" case specially.
pub fn load_settings() -> Result<Settings, SettingsError> {
    let Some(path) = settings_path() else {
        warn!("Could not determine home directory; using default settings");
        return Ok(Settings::default());
    };
    load_settings_from(&path)
}

/// Load settings from an explicit path. Absent file resolves to defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Persist settings to the canonical path, creating the directory if needed.
pub fn save_settings(settings: &Settings) -> Result<(), SettingsError> {
    let Some(path) = settings_path() else {
        warn!("Could not determine home directory; settings not saved");
        return Ok(());
    };
    save_settings_to(&path, settings)
}

/// Persist settings to an explicit path.
pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}
