//! Error responses and resync outcomes

use crate::common::fixtures::{cell_edit, request, send, test_app};
use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (app, _) = test_app(10);
    let (status, body) = send(&app, request(Method::GET, "/nope", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "no such route");
}

#[tokio::test]
async fn test_blank_session_id_rejected() {
    let (app, _) = test_app(10);
    let (status, body) = send(&app, request(Method::POST, "/sessions/%20/join", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_malformed_create_body_rejected() {
    let (app, registry) = test_app(10);
    let mut req = request(Method::POST, "/sessions/s", None);
    *req.body_mut() = axum::body::Body::from("{not json");

    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_malformed_publish_rejected() {
    let (app, _) = test_app(10);
    let (status, _) = send(
        &app,
        request(Method::POST, "/sessions/s/messages", Some(json!({"edits": "nope"}))),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_gap_reported_in_body() {
    let (app, registry) = test_app(5);
    for i in 0..14 {
        assert_ok!(registry.publish("s", vec![cell_edit(&format!("A{}", i), "v", 2, i)]));
    }

    let (status, body) = send(
        &app,
        request(Method::GET, "/sessions/s/updates?cursor=5&timeout_ms=10", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "gap", "oldest_id": 10}));

    // One before the oldest retained id is still a valid cursor
    let (_, body) = send(
        &app,
        request(Method::GET, "/sessions/s/updates?cursor=9&timeout_ms=10", None),
    )
    .await;
    assert_eq!(body["status"], "messages");
    assert_eq!(body["next_cursor"], 14);
}

#[tokio::test]
async fn test_cursor_past_tail_is_invalid() {
    let (app, registry) = test_app(10);
    assert_ok!(registry.publish("s", vec![cell_edit("A1", "v", 2, 1)]));

    let (status, body) = send(
        &app,
        request(Method::GET, "/sessions/s/updates?cursor=7&timeout_ms=10", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "invalid_cursor", "tail_id": 1}));
}

#[tokio::test]
async fn test_evicted_session_restarts_its_ids() {
    let (app, registry) = test_app(10);
    for i in 0..3 {
        assert_ok!(registry.publish("s", vec![cell_edit("A1", "v", 2, i)]));
    }
    assert!(registry.evict("s"));

    // A client still holding cursor 3 must resync against the new session
    let (_, body) = send(
        &app,
        request(Method::GET, "/sessions/s/updates?cursor=3&timeout_ms=10", None),
    )
    .await;
    assert_eq!(body["status"], "invalid_cursor");
    assert_eq!(body["tail_id"], 0);
}

#[tokio::test]
async fn test_evict_unknown_session_is_404() {
    let (app, _) = test_app(10);
    let (status, _) = send(&app, request(Method::DELETE, "/sessions/ghost", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
