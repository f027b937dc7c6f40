//! HTTP surface
//!
//! One axum router serves the OAuth callback and the Slack delivery
//! endpoints. Slack routes sit behind request signature verification.

pub mod error;
pub mod routes;
pub mod signature;

use crate::slack::TriageBot;
use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<TriageBot>,
    /// Slack signing secret
    pub signing_secret: Arc<str>,
    /// Reject OAuth callbacks whose `state` was not issued by this process
    pub verify_state: bool,
    /// Event and interaction handlers still running after the 200 was sent
    pub tasks: TaskTracker,
}

impl AppState {
    pub fn new(
        bot: Arc<TriageBot>,
        signing_secret: impl Into<Arc<str>>,
        verify_state: bool,
    ) -> Self {
        Self {
            bot,
            signing_secret: signing_secret.into(),
            verify_state,
            tasks: TaskTracker::new(),
        }
    }
}

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(state: AppState) -> Router {
    let slack = Router::new()
        .route("/slack/events", post(routes::slack_events))
        .route("/slack/interactivity", post(routes::slack_interactivity))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            routes::verify_slack_request,
        ));

    Router::new()
        .route("/oauth/callback", get(routes::oauth_callback))
        .route("/jira/oauth/callback", get(routes::oauth_callback))
        .merge(slack)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` is cancelled, then wait for in-flight handlers
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    let tasks = state.tasks.clone();
    let served = axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await;

    tasks.close();
    if !tasks.is_empty() {
        info!("Waiting for {} in-flight handlers", tasks.len());
    }
    tasks.wait().await;
    served
}
