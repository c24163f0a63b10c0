use crate::shared::ParticipantId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Id 1 belongs to whoever created the session.
pub const CREATOR_PARTICIPANT_ID: ParticipantId = 1;

/// Issues participant ids for one session, independent of message ids
#[derive(Debug)]
pub struct ParticipantIdAllocator {
    next: AtomicU64,
}

impl ParticipantIdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(CREATOR_PARTICIPANT_ID + 1),
        }
    }

    /// Hand out the next id
    pub fn next_id(&self) -> ParticipantId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The id the next call to `next_id` will return
    pub fn peek(&self) -> ParticipantId {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for ParticipantIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
