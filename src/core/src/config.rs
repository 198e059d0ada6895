use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ModpackError, Result};

/// Modpack configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModpackConfig {
    /// Log level
    pub log_level: LogLevel,

    /// Layer unpacking options
    pub unpack: UnpackConfig,
}

impl ModpackConfig {
    /// Load configuration from a YAML or JSON file.
    ///
    /// Files ending in `.json` are parsed as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ModpackError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            serde_json::from_str(&content).map_err(|e| {
                ModpackError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                ModpackError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
            })?
        };

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}

/// Layer unpacking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnpackConfig {
    /// Apply file modes recorded in the layer
    pub preserve_permissions: bool,

    /// Replace files that already exist in the target directory
    pub overwrite: bool,
}

impl Default for UnpackConfig {
    fn default() -> Self {
        Self {
            preserve_permissions: true,
            overwrite: true,
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
