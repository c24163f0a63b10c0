/**
 * Server Configuration
 *
 * Loads the server's settings in three layers, later layers winning:
 *
 * 1. Built-in defaults (port 3000, retention 1000, 30s long-polls)
 * 2. A TOML file named by `SHEETSYNC_CONFIG`, if set
 * 3. Environment variables: `SERVER_HOST`, `SERVER_PORT`, `MAX_RETAINED`,
 *    `DEFAULT_POLL_TIMEOUT_MS`, `MAX_POLL_TIMEOUT_MS`, `IDLE_TIMEOUT_SECS`,
 *    `SWEEP_INTERVAL_SECS`
 *
 * # Example file
 *
 * ```toml
 * host = "127.0.0.1"
 * port = 8080
 * idle_timeout_secs = 3600
 *
 * [sync]
 * max_retained = 500
 * ```
 *
 * # Error Handling
 *
 * Unlike optional services, bad configuration is fatal: a malformed value
 * returns `ConfigError` and the binary refuses to start.
 */

use crate::shared::{ConfigError, SyncConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the TOML config file
pub const CONFIG_PATH_ENV: &str = "SHEETSYNC_CONFIG";

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind (0 picks a free port)
    pub port: u16,
    /// Session synchronization settings
    pub sync: SyncConfig,
    /// Sessions idle longer than this are evicted; 0 disables eviction
    pub idle_timeout_secs: u64,
    /// Period of the background sweep
    pub sweep_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            sync: SyncConfig::default(),
            idle_timeout_secs: 0,
            sweep_interval_secs: 60,
        }
    }
}

impl ServerConfig {
    /// Load defaults, then the optional file, then environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => {
                tracing::info!("[Config] Loading configuration from {}", path);
                Self::from_file(&path)?
            }
            _ => Self::default(),
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Parse a TOML file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the process environment)
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = parse_var("port", &port)?;
        }
        if let Some(value) = lookup("MAX_RETAINED") {
            self.sync.max_retained = parse_var("max_retained", &value)?;
        }
        if let Some(value) = lookup("DEFAULT_POLL_TIMEOUT_MS") {
            self.sync.default_poll_timeout_ms = parse_var("default_poll_timeout_ms", &value)?;
        }
        if let Some(value) = lookup("MAX_POLL_TIMEOUT_MS") {
            self.sync.max_poll_timeout_ms = parse_var("max_poll_timeout_ms", &value)?;
        }
        if let Some(value) = lookup("IDLE_TIMEOUT_SECS") {
            self.idle_timeout_secs = parse_var("idle_timeout_secs", &value)?;
        }
        if let Some(value) = lookup("SWEEP_INTERVAL_SECS") {
            self.sweep_interval_secs = parse_var("sweep_interval_secs", &value)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "host",
                message: "must not be empty".to_string(),
            });
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sweep_interval_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        self.sync.validate()
    }

    /// `host:port` string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Idle eviction threshold, `None` when eviction is disabled
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }

    /// Period of the background sweep
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn parse_var<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        message: format!("cannot parse '{}'", value),
    })
}
