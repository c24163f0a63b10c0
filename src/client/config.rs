use crate::shared::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default server URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Sleep after the first failure is twice this value
pub const DEFAULT_BASE_BACKOFF_MS: u64 = 500;

/// Backoff never sleeps longer than this
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;

/// Long-poll poller settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Timeout requested from the server for each long-poll
    pub poll_timeout_ms: u64,
    /// Extra time the HTTP request may take beyond the long-poll timeout
    pub request_grace_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            base_backoff_ms: DEFAULT_BASE_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
            poll_timeout_ms: 30_000,
            request_grace_ms: 5_000,
        }
    }
}

impl PollerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_backoff_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "base_backoff_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.max_backoff_ms < self.base_backoff_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_backoff_ms",
                message: format!(
                    "{} is below base_backoff_ms {}",
                    self.max_backoff_ms, self.base_backoff_ms
                ),
            });
        }
        if self.poll_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_timeout_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn request_grace(&self) -> Duration {
        Duration::from_millis(self.request_grace_ms)
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    server_url: String,
    pub poller: PollerConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poller: PollerConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration pointing at `server_url`
    pub fn new(server_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::default().with_server_url(server_url)
    }

    /// Defaults, with the server URL taken from `CLIENT_API_URL` when set
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var("CLIENT_API_URL") {
            Ok(url) => Self::new(url),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Result<Self, ConfigError> {
        let server_url = server_url.into();
        if !(server_url.starts_with("http://") || server_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(server_url));
        }
        self.server_url = server_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_poller(mut self, poller: PollerConfig) -> Result<Self, ConfigError> {
        poller.validate()?;
        self.poller = poller;
        Ok(self)
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}
