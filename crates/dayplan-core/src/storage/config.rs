//! TOML-based application configuration.
//!
//! Stores the CLI-facing preferences:
//! - Default user id for commands that omit `--user`
//! - Fallback wake/sleep times used when no schedule profile exists
//!
//! Configuration is stored at `~/.config/dayplan/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dayplan/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_user")]
    pub default_user: String,
    #[serde(default = "default_wake_time")]
    pub wake_time: String,
    #[serde(default = "default_sleep_time")]
    pub sleep_time: String,
}

fn default_user() -> String {
    "default".to_string()
}
fn default_wake_time() -> String {
    "08:00".to_string()
}
fn default_sleep_time() -> String {
    "22:00".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_user: default_user(),
            wake_time: default_wake_time(),
            sleep_time: default_sleep_time(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/dayplan"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_or_default() -> Self {
        let Ok(path) = Self::path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save the configuration.
    ///
    /// # Errors
    /// Returns an error when the file cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.default_user, "default");
        assert_eq!(config.wake_time, "08:00");
        assert_eq!(config.sleep_time, "22:00");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("default_user = \"alice\"").unwrap();
        assert_eq!(config.default_user, "alice");
        assert_eq!(config.wake_time, "08:00");
    }
}
