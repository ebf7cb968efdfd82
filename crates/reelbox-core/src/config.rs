use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ReelboxError;

/// Storage key the collection blob lives under.
pub const DEFAULT_STORAGE_KEY: &str = "movieCollections";

/// Length of plot text requested for detail lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotLength {
    Short,
    Full,
}

impl std::fmt::Display for PlotLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotLength::Short => write!(f, "short"),
            PlotLength::Full => write!(f, "full"),
        }
    }
}

/// Top-level Reelbox configuration, stored at `~/.reelbox/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelboxConfig {
    /// Base URL of the OMDb API.
    #[serde(default = "default_omdb_url")]
    pub omdb_url: Url,

    /// Plot length requested when fetching a single title.
    #[serde(default = "default_plot")]
    pub plot: PlotLength,

    /// Quiet period before a typed query is sent.
    #[serde(default = "default_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Queries shorter than this are not sent.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Key of the collection blob in the local store.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_omdb_url() -> Url {
    Url::parse("https://www.omdbapi.com/").expect("static url is valid")
}

fn default_plot() -> PlotLength {
    PlotLength::Full
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_len() -> usize {
    3
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for ReelboxConfig {
    fn default() -> Self {
        Self {
            omdb_url: default_omdb_url(),
            plot: default_plot(),
            search_debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            storage_key: default_storage_key(),
        }
    }
}

impl ReelboxConfig {
    /// Returns the Reelbox home directory (`~/.reelbox/`).
    pub fn home_dir() -> Result<PathBuf, ReelboxError> {
        let base = dirs::home_dir().ok_or_else(|| ReelboxError::Config {
            message: "could not determine home directory".into(),
        })?;
        Ok(base.join(".reelbox"))
    }

    /// Returns the path to the config file.
    pub fn config_path() -> Result<PathBuf, ReelboxError> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Returns the path to the database file.
    pub fn db_path() -> Result<PathBuf, ReelboxError> {
        Ok(Self::home_dir()?.join("reelbox.db"))
    }

    /// Load config from the default location, or return defaults if not found.
    pub fn load() -> Result<Self, ReelboxError> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ReelboxError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ReelboxError::Serialization(e.to_string()))
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ReelboxError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ReelboxError::Serialization(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Initialize the Reelbox home directory with default config.
    pub fn init() -> Result<PathBuf, ReelboxError> {
        let home = Self::home_dir()?;
        std::fs::create_dir_all(&home)?;

        let config_path = Self::config_path()?;
        if !config_path.exists() {
            tracing::info!(path = %config_path.display(), "writing default config");
            Self::default().save_to(&config_path)?;
        }

        Ok(home)
    }

    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrip() {
        let config = ReelboxConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: ReelboxConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(config.omdb_url, deserialized.omdb_url);
        assert_eq!(config.search_debounce_ms, deserialized.search_debounce_ms);
        assert_eq!(config.plot, deserialized.plot);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ReelboxConfig = toml::from_str("min_query_len = 5\n").unwrap();
        assert_eq!(config.min_query_len, 5);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.debounce().as_millis(), 500);
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = ReelboxConfig::default();
        config.plot = PlotLength::Short;
        config.save_to(&path).unwrap();

        let loaded = ReelboxConfig::load_from(&path).unwrap();
        assert_eq!(loaded.plot, PlotLength::Short);
    }
}
