/**
 * Long-Poll Waiter Queue
 *
 * Holds the parked catch-up requests of one session. Every waiter is anchored
 * at a cursor and owns a oneshot sender; fulfilling a waiter removes it from
 * the queue and sends exactly one delivery. Sending on a oneshot never
 * blocks, so the publisher that drains the queue never waits on a slow
 * consumer.
 *
 * The queue itself is not synchronized. It lives inside the session's
 * exclusive section together with the message log.
 */

use crate::backend::session::log::MessageLog;
use crate::shared::{Message, MessageId, ParticipantId, SyncError};
use tokio::sync::oneshot;
use tokio::time::Instant;
use uuid::Uuid;

/// What a parked long-poll eventually receives
pub type Delivery = Result<Vec<Message>, SyncError>;

/// Identifier of a registered waiter
pub type WaiterId = Uuid;

/// A pending catch-up request
#[derive(Debug)]
pub struct Waiter {
    id: WaiterId,
    cursor: MessageId,
    deadline: Instant,
    participant: Option<ParticipantId>,
    notify: oneshot::Sender<Delivery>,
}

impl Waiter {
    /// Hand the delivery to the waiting request. Returns `false` if the
    /// request already went away.
    fn fulfill(self, delivery: Delivery) -> bool {
        self.notify.send(delivery).is_ok()
    }

    pub fn cursor(&self) -> MessageId {
        self.cursor
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn participant(&self) -> Option<ParticipantId> {
        self.participant
    }
}

/// FIFO set of pending waiters for one session
#[derive(Debug, Default)]
pub struct WaiterQueue {
    waiters: Vec<Waiter>,
}

impl WaiterQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a new waiter and return its id and the receiving end
    pub fn register(
        &mut self,
        cursor: MessageId,
        deadline: Instant,
        participant: Option<ParticipantId>,
    ) -> (WaiterId, oneshot::Receiver<Delivery>) {
        let (notify, receiver) = oneshot::channel();
        let id = Uuid::new_v4();
        self.waiters.push(Waiter {
            id,
            cursor,
            deadline,
            participant,
            notify,
        });
        (id, receiver)
    }

    /// Remove a waiter without fulfilling it. Returns `false` if it was
    /// already fulfilled or cancelled.
    pub fn cancel(&mut self, id: WaiterId) -> bool {
        match self.waiters.iter().position(|w| w.id == id) {
            Some(index) => {
                self.waiters.remove(index);
                true
            }
            None => false,
        }
    }

    /// Fulfill every waiter whose cursor is behind the log tail with the
    /// messages after its own cursor. Returns how many were fulfilled.
    pub fn drain(&mut self, log: &MessageLog) -> usize {
        self.fulfill_where(
            |w| log.has_messages_after(w.cursor),
            |w| log.slice_since(w.cursor),
        )
    }

    /// Fulfill every waiter whose deadline has passed with an empty batch
    pub fn expire(&mut self, now: Instant) -> usize {
        self.fulfill_where(|w| w.deadline <= now, |_| Ok(Vec::new()))
    }

    /// Release the waiters of one participant with an empty batch
    pub fn remove_participant(&mut self, participant: ParticipantId) -> usize {
        self.fulfill_where(|w| w.participant == Some(participant), |_| Ok(Vec::new()))
    }

    /// Fail every waiter with `SessionClosed`
    pub fn close(&mut self, session_id: &str) -> usize {
        self.fulfill_where(|_| true, |_| Err(SyncError::session_closed(session_id)))
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }

    fn fulfill_where<P, D>(&mut self, mut predicate: P, mut delivery: D) -> usize
    where
        P: FnMut(&Waiter) -> bool,
        D: FnMut(&Waiter) -> Delivery,
    {
        let mut fulfilled = 0;
        let mut remaining = Vec::with_capacity(self.waiters.len());
        for waiter in std::mem::take(&mut self.waiters) {
            if predicate(&waiter) {
                let payload = delivery(&waiter);
                if !waiter.fulfill(payload) {
                    tracing::debug!("[Subscribe] Waiter went away before delivery");
                }
                fulfilled += 1;
            } else {
                remaining.push(waiter);
            }
        }
        self.waiters = remaining;
        fulfilled
    }
}
