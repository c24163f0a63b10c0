/**
 * Session API Handlers
 *
 * HTTP rendition of the session contract:
 * - POST   /sessions/{id}          - create (idempotent)
 * - GET    /sessions/{id}          - snapshot
 * - DELETE /sessions/{id}          - evict
 * - POST   /sessions/{id}/join     - allocate participant id
 * - POST   /sessions/{id}/leave    - release participant's long-polls
 * - POST   /sessions/{id}/messages - publish a batch
 * - GET    /sessions/{id}/updates  - long-poll from a cursor
 *
 * Long-poll outcomes always answer 200 with a tagged body so clients can
 * tell "resync" from "transport failure" without parsing status codes.
 */

use crate::backend::collab::SessionRegistry;
use crate::backend::error::BackendError;
use crate::shared::protocol::{
    CreateSessionRequest, JoinResponse, LeaveRequest, LeaveResponse, PublishRequest,
    PublishResponse, SessionSnapshot, SubscribeQuery, SubscribeResponse,
};
use crate::shared::SharedError;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// Longest session id accepted
const MAX_SESSION_ID_LEN: usize = 256;

fn validate_session_id(session_id: &str) -> Result<(), BackendError> {
    if session_id.trim().is_empty() {
        return Err(SharedError::validation("session_id", "must not be empty").into());
    }
    if session_id.len() > MAX_SESSION_ID_LEN {
        return Err(SharedError::validation(
            "session_id",
            format!("must be at most {} bytes", MAX_SESSION_ID_LEN),
        )
        .into());
    }
    Ok(())
}

/// Liveness probe (GET /health)
pub async fn handle_health(State(registry): State<Arc<SessionRegistry>>) -> Json<serde_json::Value> {
    let stats = registry.stats();
    Json(serde_json::json!({
        "status": "ok",
        "active_sessions": stats.active_sessions,
        "pending_waiters": stats.pending_waiters,
    }))
}

/// Create a session, or return the existing one (POST /sessions/{id})
///
/// The body is optional; `{"metadata": "..."}` labels a new session.
pub async fn handle_create_session(
    State(registry): State<Arc<SessionRegistry>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionSnapshot>), BackendError> {
    validate_session_id(&session_id)?;
    let request: CreateSessionRequest = if body.is_empty() {
        CreateSessionRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| SharedError::validation("body", e.to_string()))?
    };

    let existed = registry.get(&session_id).is_some();
    let session = registry.get_or_create(&session_id, &request.metadata);
    let status = if existed { StatusCode::OK } else { StatusCode::CREATED };
    Ok((status, Json(session.snapshot())))
}

/// Snapshot of a session (GET /sessions/{id})
pub async fn handle_get_session(
    State(registry): State<Arc<SessionRegistry>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, BackendError> {
    registry
        .snapshot(&session_id)
        .map(Json)
        .ok_or_else(|| BackendError::not_found(session_id))
}

/// Evict a session (DELETE /sessions/{id})
pub async fn handle_evict_session(
    State(registry): State<Arc<SessionRegistry>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, BackendError> {
    if registry.evict(&session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(BackendError::not_found(session_id))
    }
}

/// Join a session (POST /sessions/{id}/join)
pub async fn handle_join(
    State(registry): State<Arc<SessionRegistry>>,
    Path(session_id): Path<String>,
) -> Result<Json<JoinResponse>, BackendError> {
    validate_session_id(&session_id)?;
    let participant_id = registry.join(&session_id)?;
    Ok(Json(JoinResponse { participant_id }))
}

/// Leave a session (POST /sessions/{id}/leave)
pub async fn handle_leave(
    State(registry): State<Arc<SessionRegistry>>,
    Path(session_id): Path<String>,
    Json(request): Json<LeaveRequest>,
) -> Json<LeaveResponse> {
    let cancelled_waiters = registry.disconnect(&session_id, request.participant_id);
    Json(LeaveResponse { cancelled_waiters })
}

/// Publish a batch of edits (POST /sessions/{id}/messages)
pub async fn handle_publish(
    State(registry): State<Arc<SessionRegistry>>,
    Path(session_id): Path<String>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, BackendError> {
    validate_session_id(&session_id)?;
    let ids = registry.publish(&session_id, request.edits)?;
    Ok(Json(PublishResponse { ids }))
}

/// Long-poll for messages after a cursor (GET /sessions/{id}/updates)
///
/// # Query Parameters
///
/// - `cursor` - last message id already consumed (default 0)
/// - `timeout_ms` - how long to park the request (clamped by config)
/// - `participant` - participant tag, so a leave can release the poll
pub async fn handle_updates(
    State(registry): State<Arc<SessionRegistry>>,
    Path(session_id): Path<String>,
    Query(query): Query<SubscribeQuery>,
) -> Result<Json<SubscribeResponse>, BackendError> {
    validate_session_id(&session_id)?;
    let result = registry
        .subscribe(&session_id, query.cursor, query.timeout_ms, query.participant)
        .await;
    if let Err(error) = &result {
        tracing::info!("[Subscribe] {} cursor {}: {}", session_id, query.cursor, error);
    }
    Ok(Json(SubscribeResponse::from_result(query.cursor, result)))
}
