//! Shared Error Types
//!
//! This module defines error types that are shared between the server and the
//! client. They represent the protocol-level outcomes of catch-up and publish
//! as well as common validation failures.
//!
//! # Error Categories
//!
//! - `SyncError` - the collaboration core's taxonomy (`Gap`, `SessionClosed`,
//!   `InvalidCursor`); every one of them demands a resync or rejoin
//! - `SharedError` - request validation failures
//!
//! # Usage
//!
//! ```rust
//! use sheetsync::shared::error::{SharedError, SyncError};
//!
//! let error = SyncError::Gap { cursor: 5, oldest_id: 10 };
//! assert!(error.requires_resync());
//!
//! let error = SharedError::validation("session_id", "must not be empty");
//! ```
//!
//! # Thread Safety
//!
//! All error types are `Send + Sync` and can be safely shared across thread boundaries.
use crate::shared::message::MessageId;
use thiserror::Error;

/// Outcome of a catch-up or publish that cannot be served incrementally
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The cursor points before the oldest retained message
    #[error("cursor {cursor} is older than the retained window (oldest id {oldest_id})")]
    Gap {
        /// Cursor the caller asked from
        cursor: MessageId,
        /// Oldest id still retained
        oldest_id: MessageId,
    },

    /// The session was evicted
    #[error("session '{session_id}' is closed")]
    SessionClosed {
        /// Evicted session
        session_id: String,
    },

    /// The cursor is ahead of anything this session has assigned
    #[error("cursor {cursor} is beyond the session tail ({tail_id})")]
    InvalidCursor {
        /// Cursor the caller asked from
        cursor: MessageId,
        /// Last id assigned by the session
        tail_id: MessageId,
    },
}

impl SyncError {
    /// Create a session-closed error
    pub fn session_closed(session_id: impl Into<String>) -> Self {
        Self::SessionClosed {
            session_id: session_id.into(),
        }
    }

    /// Whether incremental catch-up is impossible and a full snapshot is needed
    pub fn requires_resync(&self) -> bool {
        matches!(self, Self::Gap { .. } | Self::InvalidCursor { .. })
    }
}

/// Shared error types that can occur in both server and client
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
