//! Configuration module for gpumon
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`GPUMON_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use gpumon::config::MonitorConfig;
//!
//! let config = MonitorConfig::default();
//! assert_eq!(config.polling.gpu_status_ms, 5000);
//!
//! let toml = r#"
//! [server]
//! base_url = "http://gpu-box:8000"
//! "#;
//! let config: MonitorConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.base_url, "http://gpu-box:8000");
//! ```

pub mod error;
pub mod logging;
pub mod polling;
pub mod server;
pub mod store;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use polling::PollingConfig;
pub use server::ServerConfig;
pub use store::StoreConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the monitor.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Scheduler API connection
    pub server: ServerConfig,
    /// Per-resource poll cadence and retry policy
    pub polling: PollingConfig,
    /// Persisted selection store
    pub store: StoreConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl MonitorConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Io {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("GPUMON_URL") {
            if !url.is_empty() {
                self.server.base_url = url;
            }
        }
        if let Ok(level) = std::env::var("GPUMON_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("GPUMON_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        if let Ok(path) = std::env::var("GPUMON_STATE_PATH") {
            if !path.is_empty() {
                self.store.path = path.into();
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.server.base_url;
        if url.is_empty() {
            return Err(ConfigError::invalid("server.base_url", "URL cannot be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "server.base_url",
                format!("expected an http(s) URL, got '{}'", url),
            ));
        }
        if self.server.timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "server.timeout_seconds",
                "timeout must be non-zero",
            ));
        }

        let intervals = [
            ("polling.gpu_status_ms", self.polling.gpu_status_ms),
            ("polling.jobs_ms", self.polling.jobs_ms),
            ("polling.job_runner_log_ms", self.polling.job_runner_log_ms),
            ("polling.current_job_ms", self.polling.current_job_ms),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(ConfigError::invalid(
                    field,
                    "poll interval must be greater than zero",
                ));
            }
        }

        Ok(())
    }
}
