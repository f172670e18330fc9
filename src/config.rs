use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{ConsoleError, Result};
use crate::template::Method;

/// Environment variable overriding the backend address
pub const API_URL_ENV: &str = "PROBECTL_API_URL";
/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "PROBECTL_CONFIG";

/// Global probectl configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Base URL of the template backend
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Timeout for every backend request, in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Method used when a command does not name one
    #[serde(default)]
    pub default_method: Method,
}

fn default_api_url() -> String {
    "http://localhost:8765".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_timeout(),
            default_method: Method::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, applying env overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(api_url) = std::env::var(API_URL_ENV) {
            config.api_url = api_url;
        }
        Ok(config)
    }

    /// Load from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConsoleError::ConfigError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Supports PROBECTL_CONFIG environment variable for test isolation
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", "probectl")
            .ok_or_else(|| ConsoleError::ConfigError("Could not determine config directory".into()))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Parsed backend base URL
    pub fn api_base(&self) -> Result<Url> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| ConsoleError::ConfigError(format!("invalid api_url '{}': {}", self.api_url, e)))?;
        if url.cannot_be_a_base() {
            return Err(ConsoleError::ConfigError(format!(
                "api_url '{}' cannot be used as a base URL",
                self.api_url
            )));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8765");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.default_method, Method::Get);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("api_url = \"https://probes.internal\"").unwrap();
        assert_eq!(config.api_url, "https://probes.internal");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            api_url: "http://10.0.0.5:9000".into(),
            request_timeout_secs: 5,
            default_method: Method::Post,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_api_base_validation() {
        let mut config = Config::default();
        assert!(config.api_base().is_ok());

        config.api_url = "localhost:8765/api".into();
        assert!(matches!(config.api_base(), Err(ConsoleError::ConfigError(_))));

        config.api_url = "not a url".into();
        assert!(matches!(config.api_base(), Err(ConsoleError::ConfigError(_))));
    }
}
