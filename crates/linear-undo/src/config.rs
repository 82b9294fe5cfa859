/// History configuration: defaults, validation, and JSON load/save.
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Number of entries kept when no capacity is configured.
const DEFAULT_CAPACITY: usize = 5;

/// File name used when the config path is resolved next to the executable.
const CONFIG_FILE_NAME: &str = "linear-undo.json";

/// Configuration for a `HistoryManager`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of entries held in history. Must be at least 1.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl HistoryConfig {
    /// Creates a config with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Rejects configurations the manager cannot honor.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            bail!("history capacity must be at least 1");
        }
        Ok(())
    }

    /// Loads and validates a config from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// or describes an invalid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: HistoryConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Loads the config at `path`, writing the defaults there first if
    /// the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is unreadable or invalid.
    /// Failing to write the default file is only logged.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        if let Err(e) = config.save(path) {
            tracing::warn!("Failed to create default config at {}: {e:#}", path.display());
        }
        Ok(config)
    }

    /// Saves the config as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }
}

/// Resolves the config file path.
///
/// Resolution order:
/// 1. `LINEAR_UNDO_CONFIG` environment variable
/// 2. `linear-undo.json` next to the executable
pub fn resolve_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("LINEAR_UNDO_CONFIG") {
        return PathBuf::from(path);
    }
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}
