/**
 * Router Configuration
 *
 * Combines the health probe and the session API into one Axum router and
 * wraps it in a `tower-http` trace layer so every request is logged.
 *
 * Unknown paths fall through to a JSON 404.
 */

use crate::backend::collab::handlers::{
    handle_create_session, handle_evict_session, handle_get_session, handle_health, handle_join,
    handle_leave, handle_publish, handle_updates,
};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the Axum router with all routes configured
///
/// - `GET /health`
/// - `POST | GET | DELETE /sessions/{id}`
/// - `POST /sessions/{id}/join`
/// - `POST /sessions/{id}/leave`
/// - `POST /sessions/{id}/messages`
/// - `GET /sessions/{id}/updates`
pub fn create_router(app_state: AppState) -> Router<()> {
    Router::new()
        .route("/health", get(handle_health))
        .route(
            "/sessions/{id}",
            post(handle_create_session)
                .get(handle_get_session)
                .delete(handle_evict_session),
        )
        .route("/sessions/{id}/join", post(handle_join))
        .route("/sessions/{id}/leave", post(handle_leave))
        .route("/sessions/{id}/messages", post(handle_publish))
        .route("/sessions/{id}/updates", get(handle_updates))
        .fallback(|| async {
            BackendError::handler(StatusCode::NOT_FOUND, "no such route")
        })
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}
