//! Fixtures: edits, in-memory routers and live servers

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use sheetsync::backend::routes::create_router;
use sheetsync::backend::server::{AppState, ServerConfig};
use sheetsync::backend::SessionRegistry;
use sheetsync::shared::{Edit, MessageKind, ParticipantId, SyncConfig};
use std::sync::Arc;
use tower::ServiceExt;

/// Server configuration with a small retention window
pub fn test_config(max_retained: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        sync: SyncConfig::builder()
            .max_retained(max_retained)
            .default_poll_timeout_ms(1_000)
            .max_poll_timeout_ms(10_000)
            .build()
            .unwrap(),
        ..ServerConfig::default()
    }
}

/// Router plus a handle on its registry, without a background sweep
pub fn test_app(max_retained: usize) -> (Router, Arc<SessionRegistry>) {
    let state = AppState::new(test_config(max_retained));
    let registry = state.registry.clone();
    (create_router(state), registry)
}

/// A cell edit with an explicit timestamp
pub fn cell_edit(cell: &str, value: &str, originator: ParticipantId, timestamp: i64) -> Edit {
    Edit::new(MessageKind::CellEdit, value, originator)
        .with_target(cell)
        .with_timestamp(timestamp)
}

/// Build a request with an optional JSON body
pub fn request(method: Method, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send one request through the router and decode the JSON body
///
/// Bodies that are empty or not JSON decode to `Value::Null`.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

/// Serve the app on an ephemeral local port
///
/// Returns the base URL and the registry behind it.
pub async fn spawn_server(max_retained: usize) -> (String, Arc<SessionRegistry>) {
    let (app, registry) = test_app(max_retained);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{}", addr), registry)
}

/// A local URL nothing is listening on
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
