//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// What the engine does when no rematch-free bracket exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RematchPolicy {
    /// Refuse to pair the round
    #[default]
    Strict,
    /// Accept rematches as a last resort and flag them as forced
    AllowForced,
}

impl std::fmt::Display for RematchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RematchPolicy::Strict => write!(f, "strict"),
            RematchPolicy::AllowForced => write!(f, "allow-forced"),
        }
    }
}

/// Pairing engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingConfig {
    #[serde(default)]
    pub rematch_policy: RematchPolicy,

    /// Upper bound on candidate pairs tried while resolving rematches
    #[serde(default = "default_max_search_steps")]
    pub max_search_steps: u64,
}

fn default_max_search_steps() -> u64 {
    100_000
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            rematch_policy: RematchPolicy::default(),
            max_search_steps: default_max_search_steps(),
        }
    }
}

impl PairingConfig {
    /// Builder method to set the rematch policy.
    pub fn with_policy(mut self, policy: RematchPolicy) -> Self {
        self.rematch_policy = policy;
        self
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub pairing: PairingConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            pairing: PairingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pairing.max_search_steps == 0 {
            return Err(ConfigError::ValidationError(
                "pairing.max_search_steps must be greater than 0".to_string(),
            ));
        }

        if self.log_level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "log_level must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
