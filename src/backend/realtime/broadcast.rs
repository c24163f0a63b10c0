/**
 * Session Broadcasting
 *
 * The single mutation entry point of a session. A publish runs entirely
 * inside the session's exclusive section:
 *
 * 1. reduce the batch with last-write-wins
 * 2. append every survivor to the log (ids assigned, head trimmed)
 * 3. drain the waiter queue, handing each waiter the messages past its
 *    own cursor
 *
 * Hand-off to waiters is a oneshot send, so a publish never waits for the
 * requests it wakes up.
 */

use crate::backend::session::{ConflictResolver, Session};
use crate::shared::{Edit, MessageId, SyncError};

/// Publish a batch of edits to a session
///
/// # Returns
///
/// The ids assigned to the edits that survived conflict resolution, in the
/// order they were appended.
///
/// # Errors
///
/// * `SessionClosed` - the session was evicted
///
/// # Example
///
/// ```rust
/// use sheetsync::backend::session::Session;
/// use sheetsync::backend::realtime::publish;
/// use sheetsync::shared::{Edit, MessageKind};
///
/// let session = Session::new("sheet-1", "budget", 1000);
/// let ids = publish(&session, vec![
///     Edit::new(MessageKind::CellEdit, "set A1 value n 1", 2).with_target("A1"),
/// ]).unwrap();
/// assert_eq!(ids, vec![1]);
/// ```
pub fn publish(session: &Session, batch: Vec<Edit>) -> Result<Vec<MessageId>, SyncError> {
    let submitted = batch.len();
    let mut state = session.lock();
    if state.closed {
        tracing::warn!("[Broadcast] Publish to closed session {}", session.id());
        return Err(SyncError::session_closed(session.id()));
    }
    state.touch();

    let survivors = ConflictResolver::reduce(batch);
    let ids: Vec<MessageId> = survivors
        .into_iter()
        .map(|edit| state.log.append(edit))
        .collect();

    let woken = if ids.is_empty() {
        0
    } else {
        let state = &mut *state;
        state.waiters.drain(&state.log)
    };

    tracing::debug!(
        "[Broadcast] {} accepted {}/{} edit(s), ids {:?}, woke {} waiter(s)",
        session.id(),
        ids.len(),
        submitted,
        ids,
        woken
    );
    Ok(ids)
}
