//! Analyzer view: collection picker plus PDF upload.

use pdfconnect_client::UploadRequest;
use pdfconnect_common::{CollectionName, Result};
use tracing::{info, warn};

use crate::session::Session;
use crate::state::{AppEvent, AppState, SessionEvent};
use crate::views::Outcome;

/// Re-fetch the selectable collections. Never cached: every call hits the
/// backend and, on success, replaces the session's whole list.
pub async fn fetch_collections(state: &AppState, session: &Session) -> Result<Vec<CollectionName>> {
    match state.backend.list_collections().await {
        Ok(names) => {
            info!(session = %session.id, count = names.len(), "Collections refreshed");
            session.analyzer_view.replace_collections(names.clone());
            let _ = state.event_tx.send(SessionEvent {
                session: session.id,
                event: AppEvent::CollectionsRefreshed { count: names.len() },
            });
            Ok(names)
        }
        Err(e) => {
            warn!("Could not fetch collections: {}", e);
            Err(e)
        }
    }
}

/// Submit uploaded files and/or a collection for analysis. The chosen
/// collection is recorded when the request is issued, not before.
pub async fn handle_submit(state: &AppState, session: &Session, request: UploadRequest) -> Outcome {
    let selection = request.collection.clone();
    let label = describe(&request);
    let backend = state.backend.clone();
    session
        .analyzer_view
        .run_with(
            &label,
            |snap| snap.selected_collection = selection,
            async move { backend.analyze_uploads(request).await },
        )
        .await
}

fn describe(request: &UploadRequest) -> String {
    let files = request.files.len();
    match &request.collection {
        Some(c) if files > 0 => format!("{} upload(s) + {}", files, c),
        Some(c) => c.to_string(),
        None => format!("{} upload(s)", files),
    }
}
