//! Integration tests
//!
//! - `api` - session API through the router, no network
//! - `realtime` - long-poll behavior
//! - `client` - the poller against a live server

mod api;
