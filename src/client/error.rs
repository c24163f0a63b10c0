//! Client error types

use crate::shared::SyncError;
use thiserror::Error;

/// Errors surfaced by client transports and the poller
#[derive(Debug, Error)]
pub enum ClientError {
    /// Session-level outcome reported by the server
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status with the server's error message
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    /// A request URL could not be built from the server URL
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// The caller's full-document resync failed
    #[error("resync failed: {0}")]
    Resync(String),
}

impl ClientError {
    /// The session-level error, if this is one
    pub fn sync_error(&self) -> Option<&SyncError> {
        match self {
            ClientError::Sync(e) => Some(e),
            _ => None,
        }
    }

    /// True for failures the poller answers with backoff and retry
    pub fn is_transport(&self) -> bool {
        !matches!(self, ClientError::Sync(_))
    }
}
