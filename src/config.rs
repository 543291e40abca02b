//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Aggregation service connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// No timeout when unset; a stalled service keeps the dashboard loading.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://public-feedback-system.onrender.com".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ServiceConfig {
    /// Config pointing at an explicit base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Base URL with any trailing slash removed
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Request timeout, if configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Dashboard screen settings
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Company filter used when none is given on the command line
    #[serde(default)]
    pub company: String,

    /// Prefix under which the shell's screens are mounted
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

fn default_base_path() -> String {
    "/feedbacksystem".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            company: String::new(),
            base_path: default_base_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load an explicit file, or fall back to the default locations.
    ///
    /// An explicit path that fails to load is an error; default locations
    /// that fail are logged and skipped.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("sentiment-dashboard").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first candidate that exists and parses.
    ///
    /// Candidates that fail are logged and skipped.
    pub(crate) fn load_first(paths: &[PathBuf]) -> Self {
        for path in paths {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Service overrides
        if let Some(url) = lookup("SENTIMENT_API_URL") {
            self.service.base_url = url;
        }
        if let Some(timeout) = lookup("SENTIMENT_API_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => self.service.request_timeout_secs = Some(secs),
                Err(_) => {
                    tracing::warn!("Ignoring invalid SENTIMENT_API_TIMEOUT_SECS: {}", timeout)
                }
            }
        }

        // Dashboard overrides
        if let Some(company) = lookup("SENTIMENT_COMPANY") {
            self.dashboard.company = company;
        }

        // Logging overrides
        if let Some(level) = lookup("SENTIMENT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SENTIMENT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Sentiment Dashboard Configuration
#
# Environment variables override these settings:
# - SENTIMENT_API_URL
# - SENTIMENT_API_TIMEOUT_SECS
# - SENTIMENT_COMPANY
# - SENTIMENT_LOG_LEVEL
# - SENTIMENT_LOG_FORMAT

[service]
# Base URL of the feedback aggregation service
base_url = "https://public-feedback-system.onrender.com"

# Request timeout in seconds (unset = wait indefinitely)
# request_timeout_secs = 30

[dashboard]
# Default company filter (empty = global analytics)
company = ""

# Path prefix the shell mounts its screens under
base_path = "/feedbacksystem"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
