/**
 * Message Data Structures
 *
 * This module defines the edit records that flow through a session's message
 * log. The core never interprets `payload`; it only routes on `kind` and
 * resolves conflicts on `target`.
 *
 * - `Edit` is what a client submits (no id yet).
 * - `Message` is an `Edit` after the session's log has assigned it an id.
 */
use serde::{Deserialize, Serialize};

/// Participant identifier within one session
pub type ParticipantId = u64;

/// Message identifier, unique and strictly increasing within one session
pub type MessageId = u64;

/// Routing category of a message
///
/// Payload interpretation belongs to the formula engine, the renderer and
/// the save/load collaborator. The core only carries the tag along.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Plain value change of a cell or range
    CellEdit,
    /// Formula change of a cell or range
    FormulaEdit,
    /// Sheet-level command (add/rename/delete sheet, switch, ...)
    SheetControl,
    /// A participant saved the document
    DocumentSave,
}

/// An edit as submitted by a participant, before it is appended to a log
///
/// # Example
/// ```rust
/// use sheetsync::shared::{Edit, MessageKind};
///
/// let edit = Edit::new(MessageKind::CellEdit, "set A1 value n 42", 2)
///     .with_target("A1")
///     .with_timestamp(1_000);
///
/// assert_eq!(edit.target.as_deref(), Some("A1"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edit {
    /// Routing category
    pub kind: MessageKind,
    /// Cell or range reference, used only for conflict resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Opaque payload, passed through unmodified
    pub payload: String,
    /// Participant that produced the edit
    pub originator: ParticipantId,
    /// Milliseconds since the Unix epoch; the latest wins a conflict
    #[serde(default = "now_millis")]
    pub timestamp: i64,
}

impl Edit {
    /// Create an untargeted edit stamped with the current wall clock
    pub fn new(kind: MessageKind, payload: impl Into<String>, originator: ParticipantId) -> Self {
        Self {
            kind,
            target: None,
            payload: payload.into(),
            originator,
            timestamp: now_millis(),
        }
    }

    /// Set the conflict target
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Override the timestamp
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A message stored in a session log. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Assigned by the log at append time
    pub id: MessageId,
    /// Owning session
    pub session_id: String,
    /// Routing category
    pub kind: MessageKind,
    /// Conflict target, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Opaque payload
    pub payload: String,
    /// Participant that produced the message
    pub originator: ParticipantId,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Message {
    /// Turn an edit into a stored message
    pub fn from_edit(id: MessageId, session_id: impl Into<String>, edit: Edit) -> Self {
        Self {
            id,
            session_id: session_id.into(),
            kind: edit.kind,
            target: edit.target,
            payload: edit.payload,
            originator: edit.originator,
            timestamp: edit.timestamp,
        }
    }
}

/// Current UTC time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
