//! Axum router. Maps all URL paths to handlers.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    services::ServeDir,
    compression::CompressionLayer,
    trace::TraceLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    app::{app_page, app_analyze},
    analyzer::{analyzer_page, analyzer_submit},
    api::{api_collections, api_results, health},
};
use crate::sse::sse_handler;

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    router_for(Arc::new(state))
}

/// Same as `build_router`, for callers that keep a handle on the state.
pub fn router_for(shared: SharedState) -> Router {
    let static_dir = shared.config.server.static_dir.clone();
    let upload_limit = shared.config.server.max_upload_bytes();

    Router::new()
        // Pages
        .route("/",          get(app_page))
        .route("/analyze",   post(app_analyze))
        .route("/analyzer",  get(analyzer_page).post(analyzer_submit))

        // SSE streaming
        .route("/api/events", get(sse_handler))

        // API endpoints
        .route("/api/collections",     get(api_collections))
        .route("/api/results/{view}",  get(api_results))
        .route("/health",              get(health))

        // Static files
        .nest_service("/static", ServeDir::new(static_dir))

        // Middleware
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
