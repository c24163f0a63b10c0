//! # Long-Poll Client State Machine
//!
//! `ClientPoller` keeps one cursor per session and cycles
//! `Idle -> Polling -> Success | Failure`:
//!
//! - **Success**: the cursor advances to the highest id received, the
//!   backoff resets and the next poll is issued immediately.
//! - **Failure** (transport error or `SessionClosed`): the backoff doubles
//!   up to its cap and the same cursor is retried after sleeping.
//! - **Gap / InvalidCursor**: the cursor is unusable. The handler performs a
//!   full-document resync and the poller restarts from the cursor it returns.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sheetsync::client::{ClientConfig, ClientPoller, HttpTransport, PollHandler, ClientError};
//! use sheetsync::shared::{Message, MessageId};
//! use std::ops::ControlFlow;
//!
//! struct Grid;
//!
//! impl PollHandler for Grid {
//!     fn on_messages(&mut self, messages: &[Message]) -> ControlFlow<()> {
//!         for m in messages {
//!             println!("{:?} {:?} = {}", m.kind, m.target, m.payload);
//!         }
//!         ControlFlow::Continue(())
//!     }
//!
//!     async fn resync(&mut self) -> Result<MessageId, ClientError> {
//!         // Reload the document, then resume from the server's tail
//!         Ok(0)
//!     }
//! }
//!
//! # async fn example() {
//! let config = ClientConfig::default();
//! let transport = HttpTransport::new(config.clone(), "sheet-1");
//! let mut poller = ClientPoller::new(transport, &config.poller);
//! poller.run(&mut Grid).await;
//! # }
//! ```

use crate::client::backoff::Backoff;
use crate::client::config::PollerConfig;
use crate::client::error::ClientError;
use crate::client::transport::Transport;
use crate::shared::{Message, MessageId, SyncError};
use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

/// Where the poller is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
    Success,
    Failure,
}

/// Outcome of one poll and what the caller must do next
#[derive(Debug)]
pub enum PollStep {
    /// Messages were delivered (possibly none); poll again immediately
    Delivered(Vec<Message>),
    /// Transport failure; sleep `retry_in`, then retry the same cursor
    Backoff { error: ClientError, retry_in: Duration },
    /// The cursor is unusable; resync the document before polling again
    ResyncRequired(SyncError),
    /// The session is gone; rejoin or give up, retrying after `retry_in`
    SessionClosed { retry_in: Duration },
}

/// Why `ClientPoller::run` returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// The handler asked to stop
    Stopped,
    /// The session closed and the handler chose not to continue
    SessionClosed,
}

/// Callbacks driven by `ClientPoller::run`
pub trait PollHandler: Send {
    /// Apply a non-empty batch, in id order
    fn on_messages(&mut self, messages: &[Message]) -> ControlFlow<()>;

    /// Reload the whole document and return the cursor to resume from
    fn resync(&mut self) -> impl Future<Output = Result<MessageId, ClientError>> + Send;

    /// Decide whether to keep polling after the session closed
    fn on_session_closed(&mut self) -> impl Future<Output = ControlFlow<()>> + Send {
        async { ControlFlow::Break(()) }
    }
}

/// Long-poll loop for one session
#[derive(Debug)]
pub struct ClientPoller<T> {
    transport: T,
    cursor: MessageId,
    backoff: Backoff,
    state: PollerState,
    poll_timeout: Duration,
}

impl<T: Transport> ClientPoller<T> {
    /// Create a poller starting at cursor 0
    pub fn new(transport: T, config: &PollerConfig) -> Self {
        Self {
            transport,
            cursor: 0,
            backoff: Backoff::from_config(config),
            state: PollerState::Idle,
            poll_timeout: config.poll_timeout(),
        }
    }

    /// Resume from a known cursor
    pub fn with_cursor(mut self, cursor: MessageId) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn cursor(&self) -> MessageId {
        self.cursor
    }

    /// Restart from a fresh cursor, e.g. after a resync
    pub fn restart_at(&mut self, cursor: MessageId) {
        self.cursor = cursor;
        self.backoff.reset();
        self.state = PollerState::Idle;
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Issue one long-poll and update cursor, state and backoff
    ///
    /// Never sleeps; the returned step says how long the caller should wait.
    pub async fn poll_once(&mut self) -> PollStep {
        self.state = PollerState::Polling;
        match self.transport.subscribe(self.cursor, self.poll_timeout).await {
            Ok(messages) => {
                self.state = PollerState::Success;
                if let Some(max_id) = messages.iter().map(|m| m.id).max() {
                    self.cursor = self.cursor.max(max_id);
                }
                self.backoff.reset();
                PollStep::Delivered(messages)
            }
            Err(ClientError::Sync(error)) if error.requires_resync() => {
                self.state = PollerState::Failure;
                tracing::info!("[Poller] Cursor {} unusable: {}", self.cursor, error);
                PollStep::ResyncRequired(error)
            }
            Err(ClientError::Sync(SyncError::SessionClosed { session_id })) => {
                self.state = PollerState::Failure;
                let retry_in = self.backoff.fail();
                tracing::info!("[Poller] Session {} closed", session_id);
                PollStep::SessionClosed { retry_in }
            }
            Err(error) => {
                self.state = PollerState::Failure;
                let retry_in = self.backoff.fail();
                tracing::warn!(
                    "[Poller] Poll at cursor {} failed, retrying in {:?}: {}",
                    self.cursor,
                    retry_in,
                    error
                );
                PollStep::Backoff { error, retry_in }
            }
        }
    }

    /// Poll until the handler stops or gives up on a closed session
    pub async fn run<H: PollHandler>(&mut self, handler: &mut H) -> PollExit {
        loop {
            self.state = PollerState::Idle;
            match self.poll_once().await {
                PollStep::Delivered(messages) => {
                    if !messages.is_empty() && handler.on_messages(&messages).is_break() {
                        return PollExit::Stopped;
                    }
                }
                PollStep::Backoff { retry_in, .. } => tokio::time::sleep(retry_in).await,
                PollStep::ResyncRequired(_) => match handler.resync().await {
                    Ok(cursor) => {
                        tracing::info!("[Poller] Resynced, restarting at cursor {}", cursor);
                        self.restart_at(cursor);
                    }
                    Err(error) => {
                        let retry_in = self.backoff.fail();
                        tracing::warn!("[Poller] Resync failed, retrying in {:?}: {}", retry_in, error);
                        tokio::time::sleep(retry_in).await;
                    }
                },
                PollStep::SessionClosed { retry_in } => {
                    if handler.on_session_closed().await.is_break() {
                        return PollExit::SessionClosed;
                    }
                    tokio::time::sleep(retry_in).await;
                }
            }
        }
    }
}
