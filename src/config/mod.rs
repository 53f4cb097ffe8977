//! Configuration management for Openshelf.
//!
//! Configuration is read from `~/.config/openshelf/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

/// Endpoints and request tuning for the catalog API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the search API.
    pub base_url: String,
    /// Base URL for cover images.
    pub covers_base_url: String,
    /// Results requested per search.
    pub result_limit: u32,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
            covers_base_url: "https://covers.openlibrary.org/b/id".to_string(),
            result_limit: 50,
            timeout_secs: 10,
        }
    }
}

/// Where the persisted collections live.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the collection blobs. Defaults to
    /// `{data_dir}/openshelf` when unset.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/openshelf/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("openshelf").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let default_config = Self::default_config_content();

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(default_config.as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Openshelf Configuration

[api]
# Base URL of the bibliographic search API
base_url = "https://openlibrary.org"

# Base URL for cover images
covers_base_url = "https://covers.openlibrary.org/b/id"

# Results requested per search (the API caps pages at 100)
result_limit = 50

# HTTP timeout in seconds
timeout_secs = 10

[storage]
# Directory for the persisted collections (favorites, search history,
# reviews). Defaults to the platform data directory, e.g.
# ~/.local/share/openshelf on Linux.
#data_dir = "/path/to/openshelf"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.api.base_url, "https://openlibrary.org");
        assert_eq!(config.api.result_limit, 50);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[api]
result_limit = 20
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        // Custom value
        assert_eq!(config.api.result_limit, 20);
        // Default values
        assert_eq!(config.api.base_url, "https://openlibrary.org");
        assert_eq!(config.api.timeout_secs, 10);
    }

    #[test]
    fn test_empty_config() {
        let content = "";
        let config: Config = toml::from_str(content).expect("Empty config should work");

        assert_eq!(config.api.base_url, "https://openlibrary.org");
        assert_eq!(
            config.api.covers_base_url,
            "https://covers.openlibrary.org/b/id"
        );
    }

    #[test]
    fn test_custom_data_dir() {
        let content = r##"
[storage]
data_dir = "/tmp/shelf"
"##;
        let config: Config = toml::from_str(content).expect("Config should parse");
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/shelf")));
    }
}
