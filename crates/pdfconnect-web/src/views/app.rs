//! App view: one-click analysis of a predefined collection.

use pdfconnect_common::CollectionName;

use crate::session::Session;
use crate::state::AppState;
use crate::views::Outcome;

/// POST the collection name to the backend and keep the reply as the
/// session's results. Failures are logged only; the page just loses its loader.
pub async fn analyze_collection(
    state: &AppState,
    session: &Session,
    collection: CollectionName,
) -> Outcome {
    let backend = state.backend.clone();
    let label = collection.to_string();
    session
        .app_view
        .run(&label, async move { backend.analyze_collection(&collection).await })
        .await
}
