//! Analyzer page: pick a collection and/or upload PDFs.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    response::Html,
};
use axum_extra::extract::cookie::CookieJar;
use pdfconnect_client::{UploadFile, UploadRequest};
use pdfconnect_common::{AnalysisResult, CollectionName};
use tracing::warn;

use crate::handlers::layout::{esc, js_string, page};
use crate::state::SharedState;
use crate::views::{analyzer::handle_submit, Outcome, ViewSnapshot};

pub const FAILURE_ALERT: &str = "Analysis failed. Please check console for details.";

pub async fn analyzer_page(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> (CookieJar, Html<String>) {
    let (session, jar) = state.sessions.resolve(jar).await;
    (jar, Html(render_analyzer_page(&session.analyzer_view.snapshot(), None)))
}

pub async fn analyzer_submit(
    State(state): State<SharedState>,
    jar: CookieJar,
    multipart: Multipart,
) -> (CookieJar, Html<String>) {
    let (session, jar) = state.sessions.resolve(jar).await;
    let failure = match read_upload_form(multipart).await {
        Ok(request) => match handle_submit(&state, &session, request).await {
            Outcome::Failure { message } => Some(message),
            Outcome::Success { .. } | Outcome::Superseded => None,
        },
        Err(e) => {
            warn!("Malformed analyzer form: {}", e);
            Some(e.to_string())
        }
    };

    (jar, Html(render_analyzer_page(&session.analyzer_view.snapshot(), failure.as_deref())))
}

/// Collect `files` parts and the optional `collection` field.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadRequest, MultipartError> {
    let mut files = Vec::new();
    let mut collection = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("files") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                files.push(UploadFile::new(file_name, bytes.to_vec()).with_content_type(content_type));
            }
            Some("collection") => {
                collection = CollectionName::parse_optional(&field.text().await?);
            }
            _ => {}
        }
    }

    Ok(UploadRequest::new(files, collection))
}

pub fn render_analyzer_page(snap: &ViewSnapshot, failure: Option<&str>) -> String {
    let selected = snap.selected_collection.as_ref();

    let mut options = String::from(r#"<option value="">None</option>"#);
    for c in &snap.collections {
        let sel = if Some(c) == selected { " selected" } else { "" };
        options.push_str(&format!(r#"<option value="{}"{}>{}</option>"#, esc(c.as_str()), sel, esc(c.as_str())));
    }
    // Keep the last submitted choice visible even before the list is fetched.
    if let Some(c) = selected.filter(|c| !snap.collections.contains(c)) {
        options.push_str(&format!(r#"<option value="{}" selected>{}</option>"#, esc(c.as_str()), esc(c.as_str())));
    }

    let (button_label, disabled) = if snap.loading { ("Analyzing...", " disabled") } else { ("Analyze", "") };

    let results_html = match &snap.results {
        None => String::new(),
        Some(result) => format!(r#"
    <div class="results">
        <h3>Analysis Results</h3>
        <div class="sections">{}
        </div>
    </div>"#, render_section_cards(result)),
    };

    let body = format!(r#"
    <div class="analyzer-container">
        <h2>PDF Analyzer</h2>
        <form method="POST" action="/analyzer" enctype="multipart/form-data" data-loading-form>
            <div class="form-row">
                <label>
                    Collection:
                    <select name="collection" data-collections-endpoint="/api/collections">{}</select>
                </label>
            </div>
            <div class="form-row">
                <label>
                    Upload PDFs:
                    <input type="file" name="files" multiple accept=".pdf">
                </label>
            </div>
            <button type="submit" class="btn btn-primary"{}>{}</button>
        </form>
        {}
    </div>"#, options, disabled, button_label, results_html);

    let script = match failure {
        None => String::new(),
        Some(message) => format!(
            r#"<script>
console.error("Analysis failed:", {});
window.addEventListener("load", function () {{ alert({}); }});
</script>"#,
            js_string(message),
            js_string(FAILURE_ALERT)
        ),
    };

    page("Analyzer", "analyzer", &body, &script)
}

fn render_section_cards(result: &AnalysisResult) -> String {
    result.sections.iter().enumerate().map(|(i, s)| {
        let class = if s.uploaded() { "section uploaded" } else { "section" };
        let importance = s.importance.map(|v| v.to_string()).unwrap_or_default();
        format!(r#"
            <div class="{}" data-section-index="{}">
                <h4>{}</h4>
                <p>Document: {} | Page: {}</p>
                <p>Importance: {}</p>
            </div>"#,
            class, i, esc(&s.text), esc(&s.document), s.page, importance)
    }).collect()
}
