//! Common test utilities and helpers
//!
//! - Custom assertion macros
//! - Fixtures: edits, routers, live servers

#[macro_use]
pub mod assertions;

#[cfg(feature = "server")]
pub mod fixtures;
