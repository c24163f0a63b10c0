/**
 * Server Initialization
 *
 * Builds the Axum application from a `ServerConfig`:
 *
 * 1. Create the `AppState` (empty session registry)
 * 2. Start the periodic sweep task
 * 3. Create the router with all routes and the trace layer
 *
 * # Sweep Task
 *
 * Every `sweep_interval_secs` the sweep completes long-polls whose deadline
 * has passed and, when `idle_timeout_secs` is non-zero, evicts sessions with
 * no recent activity. The task holds a weak reference to the registry and
 * exits once the application is dropped.
 */

use crate::backend::collab::SessionRegistry;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;
use axum::Router;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Create and configure the Axum application
///
/// Must be called inside a Tokio runtime; the sweep task is spawned here.
pub fn create_app(config: ServerConfig) -> Router<()> {
    tracing::info!(
        "[Server] Initializing sheetsync (max_retained={}, idle_timeout_secs={})",
        config.sync.max_retained,
        config.idle_timeout_secs
    );

    let state = AppState::new(config);
    spawn_sweeper(
        &state.registry,
        state.config.sweep_interval(),
        state.config.idle_timeout(),
    );

    let app = create_router(state);
    tracing::info!("[Server] Router configured with periodic sweep task");
    app
}

/// Start the periodic sweep for a registry
pub fn spawn_sweeper(
    registry: &Arc<SessionRegistry>,
    interval: Duration,
    idle_timeout: Option<Duration>,
) -> JoinHandle<()> {
    let registry: Weak<SessionRegistry> = Arc::downgrade(registry);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let Some(registry) = registry.upgrade() else {
                tracing::debug!("[Sweep] Registry dropped, stopping");
                break;
            };
            sweep(&registry, idle_timeout);
        }
    })
}

/// One sweep pass
pub fn sweep(registry: &SessionRegistry, idle_timeout: Option<Duration>) {
    let expired = registry.expire_waiters();
    if expired > 0 {
        tracing::debug!("[Sweep] Completed {} expired long-polls", expired);
    }

    if let Some(idle_timeout) = idle_timeout {
        let evicted = registry.evict_idle(idle_timeout);
        if !evicted.is_empty() {
            tracing::info!("[Sweep] Evicted {} idle sessions: {:?}", evicted.len(), evicted);
        }
    }
}
