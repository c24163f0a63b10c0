/**
 * Application State Management
 *
 * `AppState` is the central state container handed to every handler. It
 * holds the session registry and the server configuration, both behind
 * `Arc` so cloning the state per request is cheap.
 *
 * The `FromRef` implementation lets handlers extract only the registry.
 *
 * # Example
 *
 * ```rust,no_run
 * use sheetsync::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let stats = state.registry.stats();
 *     // ...
 * }
 * ```
 */

use crate::backend::collab::SessionRegistry;
use crate::backend::server::config::ServerConfig;
use axum::extract::FromRef;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Live sessions
    pub registry: Arc<SessionRegistry>,
    /// Configuration the server was started with
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build the state for a configuration
    pub fn new(config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new(config.sync.clone())),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Arc<SessionRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.registry.clone()
    }
}
