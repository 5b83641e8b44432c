use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub markup: MarkupConfig,
    pub autosave: AutosaveConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkupConfig {
    pub bullet_glyph: String,
    pub render_bullet_glyph: bool,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            bullet_glyph: "•".to_string(),
            render_bullet_glyph: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AutosaveConfig {
    pub debounce_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { debounce_ms: 1000 }
    }
}

impl AutosaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl LogConfig {
    /// Level filter for the binary's logger. Unknown names fall back to `warn`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Warn)
    }
}

impl Config {
    /// The configuration compiled in from `default_config.toml`.
    pub fn compiled_default() -> Self {
        // build.rs rejects an unparsable default, so this only falls back if
        // the file and the structs drift apart.
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(Error::Io { .. }) => Self::compiled_default(),
            Err(e) => {
                log::warn!("ignoring {}: {}", path.display(), e);
                Self::compiled_default()
            }
        }
    }

    /// Load config from a TOML file, reporting unreadable or invalid files.
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
