/**
 * Session Registry
 *
 * Maps session ids to live sessions. Lookup goes through a sharded
 * concurrent map, so sessions never contend on a global lock; all
 * per-session serialization happens inside the session itself.
 *
 * Create (lazy, idempotent) and evict are the only mutation paths.
 */

use crate::backend::session::{Delivery, Session};
use crate::shared::protocol::SessionSnapshot;
use crate::shared::{Edit, MessageId, ParticipantId, SyncConfig, SyncError};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Aggregate numbers across all sessions
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct RegistryStats {
    pub active_sessions: usize,
    pub pending_waiters: usize,
}

/// Owner of every live session
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<Session>>,
    config: SyncConfig,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new(config: SyncConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Look up a session, creating it on first reference
    ///
    /// Repeated calls with the same id return the same session; `metadata`
    /// is only used when the session is created.
    pub fn get_or_create(&self, session_id: &str, metadata: &str) -> Arc<Session> {
        if let Some(session) = self.sessions.get(session_id) {
            return Arc::clone(session.value());
        }
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::info!("[Registry] Creating session {}", session_id);
                Arc::new(Session::new(session_id, metadata, self.config.max_retained))
            })
            .value()
            .clone()
    }

    /// Look up a session without creating it
    pub fn get(&self, session_id: &str) -> Option<Arc<Session>> {
        self.sessions.get(session_id).map(|s| Arc::clone(s.value()))
    }

    /// Remove a session and fail its pending long-polls with `SessionClosed`
    ///
    /// Returns `false` if no such session existed.
    pub fn evict(&self, session_id: &str) -> bool {
        match self.sessions.remove(session_id) {
            Some((_, session)) => {
                let failed = session.close();
                tracing::info!(
                    "[Registry] Evicted session {} ({} waiter(s) failed)",
                    session_id,
                    failed
                );
                true
            }
            None => false,
        }
    }

    /// Allocate a participant id in a session, creating it if needed
    pub fn join(&self, session_id: &str) -> Result<ParticipantId, SyncError> {
        self.get_or_create(session_id, "").join()
    }

    /// Release the pending long-polls of a participant
    ///
    /// Returns how many waiters were released, 0 for unknown sessions.
    pub fn disconnect(&self, session_id: &str, participant: ParticipantId) -> usize {
        self.get(session_id)
            .map_or(0, |session| session.disconnect(participant))
    }

    /// Publish a batch to a session, creating it if needed
    pub fn publish(&self, session_id: &str, batch: Vec<Edit>) -> Result<Vec<MessageId>, SyncError> {
        self.get_or_create(session_id, "").publish(batch)
    }

    /// Long-poll a session, creating it if needed
    ///
    /// `timeout` is resolved against the configured default and cap.
    pub async fn subscribe(
        &self,
        session_id: &str,
        cursor: MessageId,
        timeout_ms: Option<u64>,
        participant: Option<ParticipantId>,
    ) -> Delivery {
        let timeout = self.config.poll_timeout(timeout_ms);
        let session = self.get_or_create(session_id, "");
        session.subscribe(cursor, timeout, participant).await
    }

    /// Snapshot of one session
    pub fn snapshot(&self, session_id: &str) -> Option<SessionSnapshot> {
        self.get(session_id).map(|s| s.snapshot())
    }

    /// Ids of sessions that have been idle for at least `idle_for`
    pub fn idle_sessions(&self, idle_for: Duration) -> Vec<String> {
        let now = Instant::now();
        self.sessions
            .iter()
            .filter(|entry| entry.value().idle_for(now) >= idle_for)
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Evict every session idle for at least `idle_for`
    pub fn evict_idle(&self, idle_for: Duration) -> Vec<String> {
        let idle = self.idle_sessions(idle_for);
        idle.into_iter()
            .filter(|id| self.evict_if_idle(id, idle_for))
            .collect()
    }

    /// Evict one session only if it is still idle when removed
    ///
    /// Idleness is re-checked under the map's entry lock, so activity that
    /// lands after the candidate scan keeps the session alive.
    pub(crate) fn evict_if_idle(&self, session_id: &str, idle_for: Duration) -> bool {
        let now = Instant::now();
        let Some((_, session)) = self
            .sessions
            .remove_if(session_id, |_, session| session.idle_for(now) >= idle_for)
        else {
            return false;
        };
        let failed = session.close();
        tracing::info!(
            "[Registry] Evicted idle session {} ({} waiter(s) failed)",
            session_id,
            failed
        );
        true
    }

    /// Fulfill waiters whose deadline already passed, across all sessions
    pub fn expire_waiters(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .iter()
            .map(|entry| entry.value().expire_waiters(now))
            .sum()
    }

    /// Ids of all live sessions
    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        let pending_waiters = self
            .sessions
            .iter()
            .map(|entry| entry.value().snapshot().pending_waiters)
            .sum();
        RegistryStats {
            active_sessions: self.sessions.len(),
            pending_waiters,
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SyncConfig::default())
    }
}
