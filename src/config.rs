//! Calculator configuration.
//!
//! Read from `config.toml` in the user's config directory
//! (`~/.config/keypad-calc/config.toml` on Linux). Every field is optional;
//! missing fields fall back to their defaults.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "keypad-calc";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How long the error indicator stays up before the expression returns.
    pub error_revert_delay_ms: u64,
    /// Text shown when an evaluation fails.
    pub error_text: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            error_revert_delay_ms: 800,
            error_text: "Error".to_string(),
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load the config from `path`, or from [`Config::default_path`].
    ///
    /// A missing file yields the defaults. A file that cannot be read or
    /// parsed is reported and also yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Self::default(),
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }

        match Self::read(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{:#}. Using defaults.", e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn error_revert_delay(&self) -> Duration {
        Duration::from_millis(self.error_revert_delay_ms)
    }
}
