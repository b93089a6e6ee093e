//! JSON endpoints used by page scripts.

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use pdfconnect_common::{ApiError, CollectionName};

use crate::state::SharedState;
use crate::views::{analyzer::fetch_collections, ViewKind, ViewSnapshot};

/// GET /api/collections - re-fetch from the backend on every call
pub async fn api_collections(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Vec<CollectionName>>), ApiError> {
    let (session, jar) = state.sessions.resolve(jar).await;
    let names = fetch_collections(&state, &session).await?;
    Ok((jar, Json(names)))
}

/// GET /api/results/{view} - current state of one of this browser's views
pub async fn api_results(
    State(state): State<SharedState>,
    jar: CookieJar,
    Path(view): Path<ViewKind>,
) -> (CookieJar, Json<ViewSnapshot>) {
    let (session, jar) = state.sessions.resolve(jar).await;
    (jar, Json(session.view(view).snapshot()))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
