/**
 * Session Message Log
 *
 * Append-only, size-bounded window of a session's messages. Ids come from a
 * counter that only moves forward, so trimming never causes an id to be
 * reused and a cursor can always be compared against the window.
 */

use crate::shared::{Edit, Message, MessageId, SyncError};
use std::collections::VecDeque;

/// Ordered, bounded sequence of messages for one session
#[derive(Debug, Clone)]
pub struct MessageLog {
    session_id: String,
    messages: VecDeque<Message>,
    next_id: MessageId,
    max_retained: usize,
}

impl MessageLog {
    /// Create an empty log. `max_retained` is raised to 1 if zero.
    pub fn new(session_id: impl Into<String>, max_retained: usize) -> Self {
        let max_retained = max_retained.max(1);
        Self {
            session_id: session_id.into(),
            messages: VecDeque::with_capacity(max_retained.min(1024)),
            next_id: 1,
            max_retained,
        }
    }

    /// Assign the next id to `edit`, store it at the tail and trim the head
    pub fn append(&mut self, edit: Edit) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        self.messages
            .push_back(Message::from_edit(id, self.session_id.as_str(), edit));

        let overflow = self.messages.len().saturating_sub(self.max_retained);
        if overflow > 0 {
            self.messages.drain(..overflow);
            tracing::trace!(
                "[Session] {} trimmed {} message(s), window now starts at {:?}",
                self.session_id,
                overflow,
                self.oldest_id()
            );
        }
        id
    }

    /// All retained messages with `id > cursor`, ascending
    ///
    /// A cursor of exactly `oldest_id - 1` is still served in full: its first
    /// missing message is the oldest retained one, so nothing was lost.
    ///
    /// # Errors
    ///
    /// * `Gap` - a message after `cursor` has already been trimmed
    /// * `InvalidCursor` - `cursor` is beyond the last assigned id
    pub fn slice_since(&self, cursor: MessageId) -> Result<Vec<Message>, SyncError> {
        let tail_id = self.tail_id();
        if cursor > tail_id {
            return Err(SyncError::InvalidCursor { cursor, tail_id });
        }
        let Some(oldest_id) = self.oldest_id() else {
            return Ok(Vec::new());
        };
        if cursor != 0 && cursor + 1 < oldest_id {
            return Err(SyncError::Gap { cursor, oldest_id });
        }

        // Ids in the window are contiguous, so the first message past the
        // cursor sits at a fixed offset.
        let skip = cursor.saturating_sub(oldest_id - 1) as usize;
        Ok(self.messages.iter().skip(skip).cloned().collect())
    }

    /// Whether a waiter parked at `cursor` has something to receive
    pub fn has_messages_after(&self, cursor: MessageId) -> bool {
        cursor < self.tail_id()
    }

    /// Last id assigned, 0 before the first append
    pub fn tail_id(&self) -> MessageId {
        self.next_id - 1
    }

    /// Oldest id still retained
    pub fn oldest_id(&self) -> Option<MessageId> {
        self.messages.front().map(|m| m.id)
    }

    /// Number of retained messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether nothing is retained
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Retention bound
    pub fn max_retained(&self) -> usize {
        self.max_retained
    }
}
