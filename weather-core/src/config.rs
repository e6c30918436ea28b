use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::format::{ClockStyle, DEFAULT_ICON_BASE_URL, Formatting, Units};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Values shipped in sample configs that are not real keys.
const PLACEHOLDER_KEYS: &[&str] = &["PASTE_YOUR_API_KEY_HERE", "Your API Key Here"];

/// Provider endpoint URLs. Overridable so tests and proxies can redirect traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub current_url: String,
    pub forecast_url: String,
    pub icon_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            current_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            forecast_url: "https://api.openweathermap.org/data/2.5/forecast".to_string(),
            icon_url: DEFAULT_ICON_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// All three endpoints under one base URL, e.g. a mock server.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            current_url: format!("{base}/data/2.5/weather"),
            forecast_url: format!("{base}/data/2.5/forecast"),
            icon_url: format!("{base}/img/wn"),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// clock = "24h"
///
/// [endpoints]
/// current_url = "https://api.openweathermap.org/data/2.5/weather"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub units: Units,
    pub clock: ClockStyle,
    /// Country appended to 5-digit postal codes.
    pub zip_country: String,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            units: Units::default(),
            clock: ClockStyle::default(),
            zip_country: "us".to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Let [`API_KEY_ENV`] take precedence over the stored key.
    pub fn apply_env(self) -> Self {
        self.with_api_key_override(std::env::var(API_KEY_ENV).ok())
    }

    /// Replace the stored key with `key` unless it is absent or blank.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.set_api_key(key);
        }
        self
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// Returns the API key unless it is missing, blank or a placeholder.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !is_placeholder_key(key))
    }

    pub fn is_api_key_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// Formatting options for the renderer, with the clock style resolved.
    pub fn formatting(&self) -> Formatting {
        Formatting {
            units: self.units,
            clock: self.clock.resolve(),
            icon_base_url: self.endpoints.icon_url.clone(),
        }
    }
}

pub(crate) fn is_placeholder_key(key: &str) -> bool {
    key.is_empty() || PLACEHOLDER_KEYS.iter().any(|p| key.contains(p))
}
