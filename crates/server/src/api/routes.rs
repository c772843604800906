use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use remuxarr_core::{MediaProber, Notifier, Transcoder};

use super::{handlers, webhooks};
use crate::state::AppState;

pub fn create_router<P, T, N>(state: Arc<AppState<P, T, N>>) -> Router
where
    P: MediaProber + 'static,
    T: Transcoder + 'static,
    N: Notifier + 'static,
{
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/webhooks/radarr", post(webhooks::radarr))
        .route("/webhooks/sonarr", post(webhooks::sonarr))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
}
