//! API integration tests
//!
//! Integration tests for all session endpoints

mod errors_test;
mod sessions_test;
