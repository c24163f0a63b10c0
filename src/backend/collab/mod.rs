//! Collaboration Sessions Module
//!
//! Owns the set of live sessions and exposes them over HTTP.
//!
//! - **`registry`** - `SessionRegistry`: lazy creation, eviction, idle sweep
//! - **`handlers`** - Axum handlers for the session API
//!
//! # Example
//!
//! ```rust
//! use sheetsync::backend::collab::SessionRegistry;
//! use sheetsync::shared::SyncConfig;
//!
//! let registry = SessionRegistry::new(SyncConfig::default());
//! let participant = registry.join("sheet-1").unwrap();
//! assert_eq!(participant, 2);
//! ```

/// Session registry
pub mod registry;

/// HTTP handlers for the session API
pub mod handlers;

pub use registry::{RegistryStats, SessionRegistry};
