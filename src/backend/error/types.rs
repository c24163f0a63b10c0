/**
 * Backend Error Types
 *
 * This module defines error types specific to the HTTP surface of the
 * server. They wrap the core's `SyncError` and the shared validation errors
 * and carry enough information to pick an HTTP status.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Raised while processing a request: bad path parameters, malformed bodies.
 *
 * ## Not Found
 *
 * The request names a session that does not exist and the operation does
 * not create sessions lazily (snapshot, evict).
 *
 * ## Sync Errors
 *
 * Core outcomes surfaced on a non-long-poll path, e.g. publishing to a
 * session that was evicted mid-request.
 */

use crate::shared::{SharedError, SyncError};
use axum::http::StatusCode;
use thiserror::Error;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use sheetsync::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
///
/// let err = BackendError::not_found("sheet-1");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., invalid path parameter)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Unknown session
    #[error("session '{session_id}' not found")]
    NotFound {
        /// Session that was looked up
        session_id: String,
    },

    /// Collaboration core error
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Shared error (request validation)
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a not-found error for a session
    pub fn not_found(session_id: impl Into<String>) -> Self {
        Self::NotFound {
            session_id: session_id.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Sync(SyncError::SessionClosed { .. }) => StatusCode::GONE,
            Self::Sync(SyncError::Gap { .. } | SyncError::InvalidCursor { .. }) => {
                StatusCode::CONFLICT
            }
            Self::SharedError(SharedError::ValidationError { .. }) => StatusCode::BAD_REQUEST,
        }
    }

    /// A human-readable error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
