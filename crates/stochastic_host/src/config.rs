//! Host configuration management
//!
//! Handles loading configuration from environment variables, TOML files, and CLI arguments.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

const ENV_CHANNEL_CAPACITY: &str = "STOCHASTIC_LAB_CHANNEL_CAPACITY";
const ENV_PROGRESS_CHECKPOINTS: &str = "STOCHASTIC_LAB_PROGRESS_CHECKPOINTS";
const ENV_SEED: &str = "STOCHASTIC_LAB_SEED";
const ENV_LOG_LEVEL: &str = "STOCHASTIC_LAB_LOG_LEVEL";

/// Upper bound on progress checkpoints per run.
pub const MAX_PROGRESS_CHECKPOINTS: u32 = 1_000;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Channel capacity of zero.
    #[error("Invalid channel capacity: {0}. Must be at least 1")]
    InvalidChannelCapacity(usize),

    /// Checkpoint count out of range.
    #[error("Invalid progress checkpoints: {0}. Must be between 1 and {max}", max = MAX_PROGRESS_CHECKPOINTS)]
    InvalidProgressCheckpoints(u32),

    /// Unknown log level name.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unreadable or malformed configuration file.
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// Malformed environment variable.
    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Log levels supported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Every engine checkpoint.
    Trace,
    /// Run start events and stale message drops.
    Debug,
    /// Run completion events.
    #[default]
    Info,
    /// Warnings only.
    Warn,
    /// Errors only.
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Host configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Capacity of the worker-to-host message channel
    pub channel_capacity: usize,
    /// Number of progress checkpoints per run
    pub progress_checkpoints: u32,
    /// Fixed seed for every run; fresh entropy per run when absent
    pub seed: Option<u64>,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            progress_checkpoints: stochastic_engine::progress::DEFAULT_PROGRESS_CHECKPOINTS,
            seed: None,
            log_level: LogLevel::Info,
        }
    }
}

impl HostConfig {
    /// Create a new HostConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_vars(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `STOCHASTIC_LAB_*` variables returned by `lookup`.
    ///
    /// Only variables that are present are applied.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(capacity) = lookup(ENV_CHANNEL_CAPACITY) {
            self.channel_capacity = parse_var(ENV_CHANNEL_CAPACITY, &capacity)?;
        }

        if let Some(checkpoints) = lookup(ENV_PROGRESS_CHECKPOINTS) {
            self.progress_checkpoints = parse_var(ENV_PROGRESS_CHECKPOINTS, &checkpoints)?;
        }

        if let Some(seed) = lookup(ENV_SEED) {
            self.seed = Some(parse_var(ENV_SEED, &seed)?);
        }

        if let Some(log_level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&log_level)?;
        }

        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        let config: HostConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::InvalidChannelCapacity(self.channel_capacity));
        }

        if self.progress_checkpoints == 0 || self.progress_checkpoints > MAX_PROGRESS_CHECKPOINTS {
            return Err(ConfigError::InvalidProgressCheckpoints(
                self.progress_checkpoints,
            ));
        }

        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{} has invalid value '{}'", key, value)))
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Seed override
    pub seed: Option<u64>,
    /// Log level override
    pub log_level: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<HostConfig, ConfigError> {
    build_config_with(cli, |key| std::env::var(key).ok())
}

/// Same as [`build_config`] with an explicit environment lookup.
pub fn build_config_with<F>(cli: &CliArgs, lookup: F) -> Result<HostConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Start with defaults or file config
    let mut config = match &cli.config_file {
        Some(path) => HostConfig::from_file(path)?,
        None => HostConfig::default(),
    };

    config.apply_vars(lookup)?;
    config.merge_with_cli(cli)?;

    // Final validation
    config.validate()?;

    Ok(config)
}
