use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, Method},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cache::CacheGate;

pub struct AppState {
    pub cache: Arc<CacheGate>,
    /// Configured feed URLs, in display order
    pub sources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedStatus {
    pub captured_at: DateTime<Utc>,
    pub configured: usize,
    pub served: usize,
    pub failed: usize,
    pub ttl_seconds: u64,
}

/// JSON API plus static front-end assets from `static_dir`.
pub fn build_router(
    state: Arc<AppState>,
    allowed_origin: &str,
    static_dir: &str,
) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET]);

    let app = Router::new()
        .route("/api/feeds", get(feeds))
        .route("/api/feeds/status", get(feeds_status))
        .route("/health", get(health))
        .layer(cors)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

// Route handlers
pub async fn feeds(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.cache.get_snapshot(&state.sources).await;
    info!(
        "{} source feeds retrieved ({} configured)",
        snapshot.len(),
        state.sources.len()
    );
    Json(snapshot)
}

/// Describes the cached snapshot without refreshing it.
pub async fn feeds_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.cache.current().await;
    Json(FeedStatus {
        captured_at: snapshot.captured_at,
        configured: state.sources.len(),
        served: snapshot.len(),
        failed: snapshot.failed,
        ttl_seconds: state.cache.ttl().as_secs(),
    })
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
