/**
 * Long-Poll Subscription
 *
 * Catch-up for one client: return what is already past the cursor, or park
 * the request until a publish fulfills it or its deadline passes.
 *
 * # Check-then-register
 *
 * The emptiness check and the waiter registration happen under the same
 * exclusive section that publish uses. A message appended between the two
 * is therefore impossible: either the check sees it, or the waiter is
 * already registered when the publish drains the queue.
 *
 * # Cancellation
 *
 * A parked request is represented by a `WaiterGuard`. If the request future
 * is dropped (client disconnect), the guard deregisters the waiter so
 * nothing leaks and nothing is delivered into the void.
 */

use crate::backend::session::{Delivery, Session, WaiterId};
use crate::shared::{MessageId, ParticipantId, SyncError};
use std::time::Duration;
use tokio::time::Instant;

/// Deadline used when `now + timeout` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Deregisters a parked waiter unless it was disarmed first
struct WaiterGuard<'a> {
    session: &'a Session,
    id: WaiterId,
    armed: bool,
}

impl WaiterGuard<'_> {
    /// Remove the waiter now. `false` means it was fulfilled in the meantime.
    fn cancel(mut self) -> bool {
        self.armed = false;
        self.session.cancel_waiter(self.id)
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for WaiterGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.session.cancel_waiter(self.id) {
            tracing::debug!(
                "[Subscribe] {} waiter {} cancelled by disconnect",
                self.session.id(),
                self.id
            );
        }
    }
}

/// Long-poll a session from `cursor`
///
/// # Behavior
///
/// 1. Messages already past `cursor` are returned immediately.
/// 2. `Gap` / `InvalidCursor` are returned immediately; the caller has to
///    resynchronize from a full snapshot.
/// 3. Otherwise the request is parked until a publish delivers the messages
///    past `cursor`, or until `timeout` elapses, in which case an empty batch
///    is returned. Timing out is not an error.
///
/// # Errors
///
/// * `Gap` - `cursor` fell out of the retained window
/// * `InvalidCursor` - `cursor` is beyond the session tail
/// * `SessionClosed` - the session was (or gets) evicted
pub async fn subscribe(
    session: &Session,
    cursor: MessageId,
    timeout: Duration,
    participant: Option<ParticipantId>,
) -> Delivery {
    let now = Instant::now();
    let deadline = now
        .checked_add(timeout)
        .unwrap_or_else(|| now + FAR_FUTURE);

    let (guard, mut receiver) = {
        let mut state = session.lock();
        if state.closed {
            return Err(SyncError::session_closed(session.id()));
        }
        state.touch();

        let ready = state.log.slice_since(cursor)?;
        if !ready.is_empty() {
            tracing::debug!(
                "[Subscribe] {} cursor {} served {} message(s) immediately",
                session.id(),
                cursor,
                ready.len()
            );
            return Ok(ready);
        }

        let (id, receiver) = state.waiters.register(cursor, deadline, participant);
        tracing::debug!(
            "[Subscribe] {} parked waiter {} at cursor {} ({} pending)",
            session.id(),
            id,
            cursor,
            state.waiters.len()
        );
        (
            WaiterGuard {
                session,
                id,
                armed: true,
            },
            receiver,
        )
    };

    match tokio::time::timeout_at(deadline, &mut receiver).await {
        Ok(Ok(delivery)) => {
            guard.disarm();
            delivery
        }
        Ok(Err(_)) => {
            // The sender vanished without a delivery: the session is gone.
            guard.disarm();
            Err(SyncError::session_closed(session.id()))
        }
        Err(_) => {
            if guard.cancel() {
                tracing::trace!("[Subscribe] {} cursor {} timed out", session.id(), cursor);
                return Ok(Vec::new());
            }
            // Fulfilled between the deadline firing and the cancel; the
            // delivery was sent inside the section, so it is already there.
            receiver
                .try_recv()
                .unwrap_or_else(|_| Err(SyncError::session_closed(session.id())))
        }
    }
}
