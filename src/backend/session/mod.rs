//! Session Module
//!
//! One `Session` per collaboratively edited document. A session owns its
//! message log, its parked long-polls and its participant counter.
//!
//! # Exclusive section
//!
//! The log, the waiter queue and the closed flag sit behind one
//! `parking_lot::Mutex`. Publish, the check-and-register step of subscribe,
//! disconnect and close all run inside it. The lock is never held across an
//! `.await` and never taken recursively.
//!
//! # Module Structure
//!
//! ```text
//! session/
//! ├── mod.rs          - Session value type
//! ├── log.rs          - Bounded message log
//! ├── waiters.rs      - Long-poll waiter queue
//! ├── conflict.rs     - Last-write-wins batch reduction
//! └── participants.rs - Participant id allocation
//! ```

/// Bounded message log
pub mod log;

/// Long-poll waiter queue
pub mod waiters;

/// Last-write-wins batch reduction
pub mod conflict;

/// Participant id allocation
pub mod participants;

pub use conflict::ConflictResolver;
pub use log::MessageLog;
pub use participants::ParticipantIdAllocator;
pub use waiters::{Delivery, WaiterId, WaiterQueue};

use crate::shared::protocol::SessionSnapshot;
use crate::shared::{Edit, MessageId, ParticipantId, SyncError};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// State guarded by the session's exclusive section
#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) log: MessageLog,
    pub(crate) waiters: WaiterQueue,
    pub(crate) closed: bool,
    pub(crate) last_activity: Instant,
}

impl SessionState {
    pub(crate) fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// Live state of one collaborative document
#[derive(Debug)]
pub struct Session {
    id: String,
    metadata: String,
    created_at: DateTime<Utc>,
    participants: ParticipantIdAllocator,
    state: Mutex<SessionState>,
}

impl Session {
    /// Create an empty session
    pub fn new(id: impl Into<String>, metadata: impl Into<String>, max_retained: usize) -> Self {
        let id = id.into();
        Self {
            metadata: metadata.into(),
            created_at: Utc::now(),
            participants: ParticipantIdAllocator::new(),
            state: Mutex::new(SessionState {
                log: MessageLog::new(id.as_str(), max_retained),
                waiters: WaiterQueue::new(),
                closed: false,
                last_activity: Instant::now(),
            }),
            id,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Opaque label supplied at creation; never inspected
    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Enter the exclusive section
    pub(crate) fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock()
    }

    /// Resolve, append and fan out a batch. See [`crate::backend::realtime::publish`].
    pub fn publish(&self, batch: Vec<Edit>) -> Result<Vec<MessageId>, SyncError> {
        crate::backend::realtime::publish(self, batch)
    }

    /// Long-poll from `cursor`. See [`crate::backend::realtime::subscribe`].
    pub async fn subscribe(
        &self,
        cursor: MessageId,
        timeout: Duration,
        participant: Option<ParticipantId>,
    ) -> Delivery {
        crate::backend::realtime::subscribe(self, cursor, timeout, participant).await
    }

    /// Allocate an id for a newly joining participant
    pub fn join(&self) -> Result<ParticipantId, SyncError> {
        let mut state = self.lock();
        if state.closed {
            return Err(SyncError::session_closed(self.id.as_str()));
        }
        state.touch();
        let participant = self.participants.next_id();
        tracing::info!("[Session] {} participant {} joined", self.id, participant);
        Ok(participant)
    }

    /// Release the pending long-polls of a participant that disconnected
    pub fn disconnect(&self, participant: ParticipantId) -> usize {
        let released = self.lock().waiters.remove_participant(participant);
        tracing::info!(
            "[Session] {} participant {} left, released {} waiter(s)",
            self.id,
            participant,
            released
        );
        released
    }

    /// Close the session and fail every pending long-poll with `SessionClosed`
    pub fn close(&self) -> usize {
        let mut state = self.lock();
        state.closed = true;
        let failed = state.waiters.close(&self.id);
        tracing::info!("[Session] {} closed, failed {} waiter(s)", self.id, failed);
        failed
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Fulfill long-polls whose deadline has passed with an empty batch
    pub fn expire_waiters(&self, now: Instant) -> usize {
        self.lock().waiters.expire(now)
    }

    /// How long nothing has happened in this session
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.lock().last_activity)
    }

    /// Remove a parked waiter. Returns `false` if it was already fulfilled.
    pub(crate) fn cancel_waiter(&self, id: WaiterId) -> bool {
        self.lock().waiters.cancel(id)
    }

    /// Point-in-time view of the session
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            session_id: self.id.clone(),
            metadata: self.metadata.clone(),
            oldest_id: state.log.oldest_id(),
            tail_id: state.log.tail_id(),
            retained: state.log.len(),
            pending_waiters: state.waiters.len(),
            next_participant_id: self.participants.peek(),
        }
    }
}
