//! Client Module
//!
//! The client half of the long-poll protocol: a cursor-tracking poller with
//! capped exponential backoff, and the transports it polls through.
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs          - Module exports and documentation
//! ├── config.rs       - ClientConfig and PollerConfig
//! ├── backoff.rs      - Capped exponential backoff
//! ├── poller.rs       - ClientPoller state machine and PollHandler
//! ├── transport.rs    - Transport trait, HttpTransport, LocalTransport
//! └── error.rs        - ClientError
//! ```

/// Client configuration
pub mod config;

/// Capped exponential backoff
pub mod backoff;

/// Long-poll state machine
pub mod poller;

/// Long-poll transports
pub mod transport;

/// Client error types
pub mod error;

pub use backoff::Backoff;
pub use config::{ClientConfig, PollerConfig};
pub use error::ClientError;
pub use poller::{ClientPoller, PollExit, PollHandler, PollStep, PollerState};
#[cfg(feature = "server")]
pub use transport::LocalTransport;
pub use transport::{HttpTransport, Transport};
