//! Real-time Update Module
//!
//! This module holds the two operations that move messages through a session:
//! publishing a batch of edits and long-polling for what comes after a cursor.
//!
//! # Architecture
//!
//! - **`broadcast`** - publish: conflict reduction, append, waiter drain
//! - **`subscription`** - long-poll: immediate catch-up or park-until-deadline
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── broadcast.rs    - Publish path
//! └── subscription.rs - Long-poll path
//! ```
//!
//! # Ordering guarantees
//!
//! Both operations enter the same per-session exclusive section, so a
//! message is either visible to a subscriber's initial check or delivered to
//! its waiter by the publish that appended it. Different sessions never
//! contend with each other.
//!
//! # Example
//!
//! ```rust,no_run
//! use sheetsync::backend::session::Session;
//! use sheetsync::backend::realtime::{publish, subscribe};
//! use sheetsync::shared::{Edit, MessageKind};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::new("sheet-1", "budget", 1000);
//! publish(&session, vec![Edit::new(MessageKind::CellEdit, "set A1 value n 1", 2)])?;
//!
//! let messages = subscribe(&session, 0, Duration::from_secs(30), None).await?;
//! assert_eq!(messages.len(), 1);
//! # Ok(())
//! # }
//! ```

/// Publish path
pub mod broadcast;

/// Long-poll path
pub mod subscription;

pub use broadcast::publish;
pub use subscription::subscribe;
