//! Backend Module
//!
//! This module contains all server-side code for sheetsync: the session
//! engine and the Axum HTTP server that exposes it.
//!
//! This module is only compiled when the `server` feature is enabled.
//!
//! # Architecture
//!
//! - **`session`** - One session: bounded message log, waiter queue,
//!   participant ids, conflict resolution
//! - **`realtime`** - Publish and long-poll subscribe over a session
//! - **`collab`** - Session registry and HTTP handlers
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - sheetsync-server binary
//! ├── session/        - MessageLog, WaiterQueue, ConflictResolver, participants
//! ├── realtime/       - Broadcaster (publish) and subscription (long-poll)
//! ├── collab/         - SessionRegistry and handlers
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! └── error/          - Error types
//! ```
//!
//! # Concurrency
//!
//! Each session guards its log, waiter queue and closed flag with one
//! `parking_lot::Mutex`. Publishing, registering a waiter and fulfilling
//! waiters all happen inside that section, so a waiter can never miss a
//! message appended between its catch-up check and its registration. The
//! lock is never held across an `.await`.

/// Per-session state
pub mod session;

/// Publish and subscribe
pub mod realtime;

/// Session registry and HTTP handlers
pub mod collab;

/// Server initialization and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

pub use collab::SessionRegistry;
pub use error::BackendError;
pub use server::{create_app, AppState, ServerConfig};
pub use session::Session;
