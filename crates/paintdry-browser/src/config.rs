//! Client configuration: defaults, TOML file, environment and flags

use crate::columns::AutosizeOptions;
use crate::router::HOME_PATH;
use paintdry_api::{API_URL_ENV, DEFAULT_API_URL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    /// Base URL of the backend
    pub api_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Route shown when the browser starts without one
    pub start_path: String,
    pub include_outliers: bool,
    pub outliers_factor: f64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            start_path: HOME_PATH.to_string(),
            include_outliers: false,
            outliers_factor: 1.5,
        }
    }
}

impl BrowserConfig {
    /// `<config dir>/paintdry/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("paintdry").join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: BrowserConfig =
            toml::from_str(contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Effective configuration: defaults, then the config file (`explicit`, or
    /// the default path if it exists), then `PAINTDRY_API_URL`, then `api_url`.
    pub fn resolve(explicit: Option<&Path>, api_url: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    log::debug!("using config file {}", path.display());
                    Self::load(&path)?
                }
                None => Self::default(),
            },
        };
        config.apply_overrides(std::env::var(API_URL_ENV).ok(), api_url);
        config.validate()?;
        Ok(config)
    }

    /// Environment first, then the command-line flag; empty values are ignored
    pub fn apply_overrides(&mut self, env_url: Option<String>, flag_url: Option<&str>) {
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(url) = flag_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url.to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_url must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than zero".into(),
            ));
        }
        if !self.outliers_factor.is_finite() || self.outliers_factor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "outliers_factor must be a positive number, got {}",
                self.outliers_factor
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn autosize(&self) -> AutosizeOptions {
        AutosizeOptions {
            include_outliers: self.include_outliers,
            outliers_factor: self.outliers_factor,
            ..AutosizeOptions::default()
        }
    }
}
