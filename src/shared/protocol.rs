/**
 * Shared Protocol Types
 *
 * Request and response bodies of the session API. The transport only has to
 * carry these logical fields; JSON is what the bundled HTTP surface uses.
 */

use crate::shared::error::SyncError;
use crate::shared::message::{Edit, Message, MessageId, ParticipantId};
use serde::{Deserialize, Serialize};

/// Request to create (or look up) a session
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateSessionRequest {
    /// Opaque label, e.g. the document name
    #[serde(default)]
    pub metadata: String,
}

/// Point-in-time view of a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Session identifier
    pub session_id: String,
    /// Opaque label supplied at creation
    pub metadata: String,
    /// Oldest retained message id, if any message is retained
    pub oldest_id: Option<MessageId>,
    /// Last id assigned (0 before the first append)
    pub tail_id: MessageId,
    /// Number of retained messages
    pub retained: usize,
    /// Long-poll requests currently parked
    pub pending_waiters: usize,
    /// Id the next joining participant will receive
    pub next_participant_id: ParticipantId,
}

/// Response to a join
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinResponse {
    /// Newly allocated participant id
    pub participant_id: ParticipantId,
}

/// Request to leave a session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaveRequest {
    /// Participant that is leaving
    pub participant_id: ParticipantId,
}

/// Response to a leave
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaveResponse {
    /// Pending long-polls of that participant that were cancelled
    pub cancelled_waiters: usize,
}

/// Batch of edits published together
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishRequest {
    /// Edits submitted together; conflicts are resolved within this batch only
    pub edits: Vec<Edit>,
}

/// Acknowledgment of a publish
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishResponse {
    /// Ids assigned to the edits that survived conflict resolution
    pub ids: Vec<MessageId>,
}

/// Query parameters of a long-poll
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscribeQuery {
    /// Last message id already consumed (0 = from the start of the window)
    #[serde(default)]
    pub cursor: MessageId,
    /// How long to park the request when nothing is available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Participant tag, so a leave can cancel the pending poll
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<ParticipantId>,
}

/// Outcome of a long-poll
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubscribeResponse {
    /// New messages (possibly none if the poll timed out)
    Messages {
        /// Messages after the cursor, ascending by id
        messages: Vec<Message>,
        /// Cursor to use for the next poll
        next_cursor: MessageId,
    },
    /// The cursor fell out of the retained window
    Gap {
        /// Oldest id still retained
        oldest_id: MessageId,
    },
    /// The cursor is beyond the session tail
    InvalidCursor {
        /// Last id the session assigned
        tail_id: MessageId,
    },
    /// The session was evicted
    SessionClosed,
}

impl SubscribeResponse {
    /// Build the response for a subscribe outcome
    pub fn from_result(cursor: MessageId, result: Result<Vec<Message>, SyncError>) -> Self {
        match result {
            Ok(messages) => {
                let next_cursor = messages.last().map_or(cursor, |m| m.id);
                Self::Messages {
                    messages,
                    next_cursor,
                }
            }
            Err(SyncError::Gap { oldest_id, .. }) => Self::Gap { oldest_id },
            Err(SyncError::InvalidCursor { tail_id, .. }) => Self::InvalidCursor { tail_id },
            Err(SyncError::SessionClosed { .. }) => Self::SessionClosed,
        }
    }

    /// Turn the response back into a subscribe outcome
    pub fn into_result(self, session_id: &str, cursor: MessageId) -> Result<Vec<Message>, SyncError> {
        match self {
            Self::Messages { messages, .. } => Ok(messages),
            Self::Gap { oldest_id } => Err(SyncError::Gap { cursor, oldest_id }),
            Self::InvalidCursor { tail_id } => Err(SyncError::InvalidCursor { cursor, tail_id }),
            Self::SessionClosed => Err(SyncError::session_closed(session_id)),
        }
    }
}
