//! # Capped Exponential Backoff
//!
//! The sleep doubles on every consecutive failure, never exceeds the cap,
//! and drops back to the base after any success. With the defaults the
//! sleeps are 1000, 2000, 4000 ... 30000 ms.

use crate::client::config::PollerConfig;
use std::time::Duration;

/// Backoff state of one poller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    /// Create a backoff starting at `base`, capped at `max`
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max: max.max(base),
            current: base,
        }
    }

    pub fn from_config(config: &PollerConfig) -> Self {
        Self::new(
            Duration::from_millis(config.base_backoff_ms),
            Duration::from_millis(config.max_backoff_ms),
        )
    }

    /// Record a failure and return how long to sleep before retrying
    pub fn fail(&mut self) -> Duration {
        self.current = self.current.saturating_mul(2).min(self.max);
        self.current
    }

    /// Record a success
    pub fn reset(&mut self) {
        self.current = self.base;
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::from_config(&PollerConfig::default())
    }
}
