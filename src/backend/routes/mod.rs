//! Route Configuration Module
//!
//! Assembles the HTTP surface of the sync server.
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! └── router.rs       - Main router creation
//! ```
//!
//! Handlers live next to the state they touch (`backend::collab::handlers`);
//! this module only wires paths to them.

/// Main router creation
pub mod router;

pub use router::create_router;
