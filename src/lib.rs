//! sheetsync - Collaborative Spreadsheet Session Sync
//!
//! Keeps every participant of a shared spreadsheet session up to date with
//! the edits of the others over plain HTTP long-polling.
//!
//! # Overview
//!
//! - Each session keeps a bounded, id-ordered log of recent edits. Old
//!   entries are trimmed; a client whose cursor falls out of the window is
//!   told to resynchronize from a full document snapshot.
//! - Clients long-poll from a cursor. A request returns as soon as messages
//!   past the cursor exist, or with an empty batch at its deadline.
//! - Edits published together are reduced last-write-wins per cell before
//!   they are logged.
//! - The client poller retries failed polls with capped exponential backoff.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between server and client
//!   - Edits, messages, protocol bodies, error taxonomy, sync configuration
//!
//! - **`backend`** - Server-side code (only compiled with `server` feature)
//!   - Session engine (log, waiters, conflicts, participant ids)
//!   - Session registry with idle eviction
//!   - Axum HTTP server
//!
//! - **`client`** - Long-poll client
//!   - `ClientPoller` state machine, `HttpTransport`, `LocalTransport`
//!
//! # Feature Flags
//!
//! - **`server`** (default) - Enables the `backend` module and the
//!   `sheetsync-server` binary
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! use sheetsync::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::default());
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## In-Process
//!
//! ```rust
//! use sheetsync::backend::SessionRegistry;
//! use sheetsync::shared::{Edit, MessageKind, SyncConfig};
//!
//! let registry = SessionRegistry::new(SyncConfig::default());
//! let ids = registry
//!     .publish("budget", vec![Edit::new(MessageKind::CellEdit, "42", 1).with_target("B2")])
//!     .unwrap();
//! assert_eq!(ids, vec![1]);
//! ```
//!
//! # Thread Safety
//!
//! - **Server**: one `parking_lot::Mutex` per session, sessions in a
//!   `DashMap`; no lock is held across an `.await`
//! - **Client**: a poller is owned by one task
//!
//! # Error Handling
//!
//! - `shared::SyncError` - `Gap`, `SessionClosed`, `InvalidCursor`
//! - `backend::BackendError` - HTTP-facing errors with JSON bodies
//! - `client::ClientError` - session outcomes plus transport failures
//! - `shared::ConfigError` - invalid configuration

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "server")]
pub mod backend;

/// Long-poll client
pub mod client;
