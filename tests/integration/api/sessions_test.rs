//! Session lifecycle endpoints

use crate::common::fixtures::{request, send, test_app};
use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app(10);
    let (status, body) = send(&app, request(Method::GET, "/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["active_sessions"], 0);
}

#[tokio::test]
async fn test_create_is_idempotent() {
    let (app, registry) = test_app(10);

    let (status, body) = send(
        &app,
        request(Method::POST, "/sessions/budget", Some(json!({"metadata": "Q3 budget"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["session_id"], "budget");
    assert_eq!(body["metadata"], "Q3 budget");
    assert_eq!(body["tail_id"], 0);
    assert_eq!(body["next_participant_id"], 2);

    // Second create returns the existing session untouched
    let (status, body) = send(&app, request(Method::POST, "/sessions/budget", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"], "Q3 budget");
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_join_allocates_distinct_ids() {
    let (app, _) = test_app(10);
    send(&app, request(Method::POST, "/sessions/s", None)).await;

    let (_, first) = send(&app, request(Method::POST, "/sessions/s/join", None)).await;
    let (_, second) = send(&app, request(Method::POST, "/sessions/s/join", None)).await;

    assert_eq!(first["participant_id"], 2);
    assert_eq!(second["participant_id"], 3);
}

#[tokio::test]
async fn test_publish_then_catch_up() {
    let (app, _) = test_app(10);

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/sessions/s/messages",
            Some(json!({"edits": [
                {"kind": "cell_edit", "target": "A1", "payload": "1", "originator": 2, "timestamp": 10},
                {"kind": "formula_edit", "target": "B1", "payload": "=A1*2", "originator": 2, "timestamp": 11}
            ]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ids"], json!([1, 2]));

    let (status, body) = send(
        &app,
        request(Method::GET, "/sessions/s/updates?cursor=0&timeout_ms=10", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "messages");
    assert_eq!(body["next_cursor"], 2);
    assert_eq!(body["messages"][1]["kind"], "formula_edit");
    assert_eq!(body["messages"][1]["payload"], "=A1*2");

    let (_, body) = send(
        &app,
        request(Method::GET, "/sessions/s/updates?cursor=1&timeout_ms=10", None),
    )
    .await;
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_batch_conflict_keeps_latest_timestamp() {
    let (app, registry) = test_app(10);

    let (_, body) = send(
        &app,
        request(
            Method::POST,
            "/sessions/s/messages",
            Some(json!({"edits": [
                {"kind": "cell_edit", "target": "A1", "payload": "x", "originator": 2, "timestamp": 1000},
                {"kind": "cell_edit", "target": "A1", "payload": "y", "originator": 3, "timestamp": 1001},
                {"kind": "cell_edit", "target": "A1", "payload": "z", "originator": 4, "timestamp": 999}
            ]})),
        ),
    )
    .await;
    assert_eq!(body["ids"], json!([1]));

    let messages = assert_ok!(registry.subscribe("s", 0, Some(10), None).await);
    assert_eq!(messages[0].payload, "y");
    assert_eq!(messages[0].originator, 3);
}

#[tokio::test]
async fn test_snapshot_and_evict() {
    let (app, _) = test_app(3);
    for i in 0..5 {
        send(
            &app,
            request(
                Method::POST,
                "/sessions/s/messages",
                Some(json!({"edits": [{"kind": "cell_edit", "target": format!("A{}", i), "payload": "v", "originator": 2}]})),
            ),
        )
        .await;
    }

    let (status, body) = send(&app, request(Method::GET, "/sessions/s", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["oldest_id"], 3);
    assert_eq!(body["tail_id"], 5);
    assert_eq!(body["retained"], 3);

    let (status, _) = send(&app, request(Method::DELETE, "/sessions/s", None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, request(Method::GET, "/sessions/s", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_leave_releases_pending_poll() {
    let (app, registry) = test_app(10);
    let (_, joined) = send(&app, request(Method::POST, "/sessions/s/join", None)).await;
    let participant = joined["participant_id"].as_u64().unwrap();

    let poll = tokio::spawn({
        let app = app.clone();
        async move {
            send(
                &app,
                request(
                    Method::GET,
                    &format!("/sessions/s/updates?cursor=0&timeout_ms=10000&participant={}", participant),
                    None,
                ),
            )
            .await
        }
    });

    while registry.stats().pending_waiters == 0 {
        tokio::task::yield_now().await;
    }

    let (status, body) = send(
        &app,
        request(Method::POST, "/sessions/s/leave", Some(json!({"participant_id": participant}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cancelled_waiters"], 1);

    let (status, body) = poll.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "messages");
    assert_eq!(body["messages"], json!([]));
    assert_eq!(body["next_cursor"], 0);
}
