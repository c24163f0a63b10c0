//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and the client. These types are used for serialization and
//! communication over the session API.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code. All types are designed for serialization
//! and transmission over HTTP.

/// Edit and message data structures
pub mod message;

/// Request/response bodies of the session API
pub mod protocol;

/// Shared error types
pub mod error;

/// Core synchronization configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use message::{Edit, Message, MessageId, MessageKind, ParticipantId};
pub use error::{SharedError, SyncError};
pub use config::{ConfigError, SyncConfig, SyncConfigBuilder};
pub use protocol::{SessionSnapshot, SubscribeResponse};
