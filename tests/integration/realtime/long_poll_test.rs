//! Long-poll delivery through the registry

use crate::common::fixtures::{cell_edit, request, send, test_app};
use axum::http::Method;
use sheetsync::backend::SessionRegistry;
use sheetsync::shared::{Edit, MessageKind, SyncConfig, SyncError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn registry(max_retained: usize) -> Arc<SessionRegistry> {
    Arc::new(SessionRegistry::new(
        SyncConfig::builder().max_retained(max_retained).build().unwrap(),
    ))
}

async fn wait_for_waiters(registry: &SessionRegistry, count: usize) {
    while registry.stats().pending_waiters < count {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_window_holds_last_hundred_of_hundred_fifty() {
    let registry = registry(100);
    for i in 0..150 {
        let edit = Edit::new(MessageKind::CellEdit, format!("msg{}", i), 2);
        assert_ok!(registry.publish("s", vec![edit]));
    }

    let messages = assert_ok!(registry.subscribe("s", 0, Some(10), None).await);
    assert_ids!(messages, 51, 150);
    assert_eq!(messages[0].payload, "msg50");
    assert_eq!(messages[99].payload, "msg149");
}

#[tokio::test(start_paused = true)]
async fn test_idle_poll_times_out_empty() {
    let registry = registry(10);
    let started = Instant::now();

    let messages = assert_ok!(registry.subscribe("s", 0, Some(50), None).await);

    assert!(messages.is_empty());
    assert_eq!(started.elapsed(), Duration::from_millis(50));
    assert_eq!(registry.stats().pending_waiters, 0);
}

#[tokio::test]
async fn test_stale_cursor_reports_gap() {
    let registry = registry(5);
    for i in 0..14 {
        assert_ok!(registry.publish("s", vec![cell_edit(&format!("A{}", i), "v", 2, i)]));
    }

    assert_err!(
        registry.subscribe("s", 5, Some(10), None).await,
        SyncError::Gap {
            cursor: 5,
            oldest_id: 10
        }
    );
}

#[tokio::test]
async fn test_publish_wakes_every_parked_poll() {
    let registry = registry(10);
    let polls: Vec<_> = (0..3)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.subscribe("s", 0, Some(10_000), None).await })
        })
        .collect();
    wait_for_waiters(&registry, 3).await;

    assert_ok!(registry.publish("s", vec![cell_edit("C3", "7", 2, 1)]));

    for poll in polls {
        let messages = assert_ok!(poll.await.unwrap());
        assert_ids!(messages, 1, 1);
    }
    assert_eq!(registry.stats().pending_waiters, 0);
}

#[tokio::test]
async fn test_dropped_poll_deregisters() {
    let registry = registry(10);
    let poll = tokio::spawn({
        let registry = registry.clone();
        async move { registry.subscribe("s", 0, Some(10_000), None).await }
    });
    wait_for_waiters(&registry, 1).await;

    poll.abort();
    assert!(poll.await.unwrap_err().is_cancelled());
    assert_eq!(registry.stats().pending_waiters, 0);
}

#[tokio::test]
async fn test_eviction_closes_parked_polls() {
    let registry = registry(10);
    let poll = tokio::spawn({
        let registry = registry.clone();
        async move { registry.subscribe("s", 0, Some(10_000), None).await }
    });
    wait_for_waiters(&registry, 1).await;

    assert!(registry.evict("s"));
    assert_err!(poll.await.unwrap(), SyncError::SessionClosed { .. });
}

#[tokio::test(start_paused = true)]
async fn test_parked_poll_completes_at_deadline() {
    let registry = registry(10);
    let poll = tokio::spawn({
        let registry = registry.clone();
        async move { registry.subscribe("s", 0, Some(1_000), None).await }
    });
    wait_for_waiters(&registry, 1).await;

    tokio::time::advance(Duration::from_millis(1_000)).await;
    registry.expire_waiters();

    let messages = assert_ok!(poll.await.unwrap());
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_http_poll_completes_on_publish() {
    let (app, registry) = test_app(10);
    let poll = tokio::spawn({
        let app = app.clone();
        async move {
            send(
                &app,
                request(Method::GET, "/sessions/s/updates?cursor=0&timeout_ms=10000", None),
            )
            .await
        }
    });
    wait_for_waiters(&registry, 1).await;

    let (_, ack) = send(
        &app,
        request(
            Method::POST,
            "/sessions/s/messages",
            Some(serde_json::json!({"edits": [{"kind": "document_save", "payload": "", "originator": 2}]})),
        ),
    )
    .await;
    assert_eq!(ack["ids"], serde_json::json!([1]));

    let (_, body) = poll.await.unwrap();
    assert_eq!(body["status"], "messages");
    assert_eq!(body["messages"][0]["kind"], "document_save");
    assert_eq!(body["next_cursor"], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_publishers_never_skip_ids() {
    let registry = registry(1_000);
    let reader = tokio::spawn({
        let registry = registry.clone();
        async move {
            let mut cursor = 0;
            let mut seen = Vec::new();
            while seen.len() < 200 {
                let batch = registry.subscribe("s", cursor, Some(5_000), None).await.unwrap();
                if let Some(last) = batch.last() {
                    cursor = last.id;
                }
                seen.extend(batch.into_iter().map(|m| m.id));
            }
            seen
        }
    });

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let registry = registry.clone();
            tokio::spawn(async move {
                for i in 0..50 {
                    let edit = cell_edit(&format!("W{}R{}", w, i), "v", 2 + w, i);
                    registry.publish("s", vec![edit]).unwrap();
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap();
    }

    let seen = reader.await.unwrap();
    assert_eq!(seen, (1..=200).collect::<Vec<u64>>());
}
