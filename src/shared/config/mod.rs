//! Synchronization configuration module
//!
//! Provides the tunables of the collaboration core shared by the server and
//! in-process embedders.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default number of messages retained per session
pub const DEFAULT_MAX_RETAINED: usize = 1000;

/// Default long-poll timeout in milliseconds
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 30_000;

/// Upper bound a client may request for a long-poll timeout
pub const DEFAULT_MAX_POLL_TIMEOUT_MS: u64 = 60_000;

/// Core synchronization configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Messages kept per session before the oldest are trimmed
    pub max_retained: usize,
    /// Long-poll timeout used when the caller does not specify one
    pub default_poll_timeout_ms: u64,
    /// Long-poll timeouts are clamped to this value
    pub max_poll_timeout_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_retained: DEFAULT_MAX_RETAINED,
            default_poll_timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
            max_poll_timeout_ms: DEFAULT_MAX_POLL_TIMEOUT_MS,
        }
    }
}

impl SyncConfig {
    /// Create a new SyncConfigBuilder
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retained == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_retained",
                message: "must be at least 1".to_string(),
            });
        }
        if self.default_poll_timeout_ms == 0 || self.max_poll_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_timeout_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.default_poll_timeout_ms > self.max_poll_timeout_ms {
            return Err(ConfigError::InvalidValue {
                field: "default_poll_timeout_ms",
                message: format!(
                    "{} exceeds max_poll_timeout_ms {}",
                    self.default_poll_timeout_ms, self.max_poll_timeout_ms
                ),
            });
        }
        Ok(())
    }

    /// Resolve a requested long-poll timeout against the defaults and the cap
    pub fn poll_timeout(&self, requested_ms: Option<u64>) -> Duration {
        let ms = requested_ms
            .unwrap_or(self.default_poll_timeout_ms)
            .min(self.max_poll_timeout_ms);
        Duration::from_millis(ms)
    }
}

/// Builder for SyncConfig
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    max_retained: Option<usize>,
    default_poll_timeout_ms: Option<u64>,
    max_poll_timeout_ms: Option<u64>,
}

impl SyncConfigBuilder {
    /// Set the per-session retention bound
    pub fn max_retained(mut self, max_retained: usize) -> Self {
        self.max_retained = Some(max_retained);
        self
    }

    /// Set the default long-poll timeout
    pub fn default_poll_timeout_ms(mut self, ms: u64) -> Self {
        self.default_poll_timeout_ms = Some(ms);
        self
    }

    /// Set the long-poll timeout cap
    pub fn max_poll_timeout_ms(mut self, ms: u64) -> Self {
        self.max_poll_timeout_ms = Some(ms);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<SyncConfig, ConfigError> {
        let defaults = SyncConfig::default();
        let config = SyncConfig {
            max_retained: self.max_retained.unwrap_or(defaults.max_retained),
            default_poll_timeout_ms: self
                .default_poll_timeout_ms
                .unwrap_or(defaults.default_poll_timeout_ms),
            max_poll_timeout_ms: self
                .max_poll_timeout_ms
                .unwrap_or(defaults.max_poll_timeout_ms),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}
