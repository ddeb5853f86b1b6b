//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SubmergeError, SubmergeResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default merge settings.
    pub merge: MergeDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default merge parameters, used when a command does not override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeDefaults {
    /// Default synchronization threshold in milliseconds.
    pub sync_threshold_ms: u64,

    /// Upper bound accepted for any synchronization threshold.
    pub max_sync_threshold_ms: u64,

    /// Extension given to derived output files (without the dot).
    pub output_extension: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "submerge_formats=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for MergeDefaults {
    fn default() -> Self {
        Self {
            sync_threshold_ms: 500,
            max_sync_threshold_ms: 10_000,
            output_extension: "ass".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl MergeDefaults {
    /// Check a threshold against the configured bound.
    pub fn validate_threshold(&self, threshold_ms: u64) -> SubmergeResult<u64> {
        if threshold_ms > self.max_sync_threshold_ms {
            return Err(SubmergeError::config(format!(
                "sync threshold {threshold_ms} ms exceeds the maximum of {} ms",
                self.max_sync_threshold_ms
            )));
        }
        Ok(threshold_ms)
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> SubmergeResult<Self> {
        if !path.exists() {
            return Err(SubmergeError::file_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.merge.validate_threshold(config.merge.sync_threshold_ms)?;
        Ok(config)
    }

    /// Save config to the given path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> SubmergeResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Save config to the standard location.
    pub fn save(&self) -> SubmergeResult<()> {
        self.save_to(&config_file_path())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("submerge").join("config.json")
}
