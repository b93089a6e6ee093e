//! App page: three preset collections, knowledge graph, key sections.

use axum::{extract::State, response::Html, Form};
use axum_extra::extract::cookie::CookieJar;
use pdfconnect_common::{AnalysisResult, CollectionName};
use pdfconnect_config::Config;
use serde::Deserialize;
use tracing::warn;

use crate::graph::render_knowledge_graph;
use crate::handlers::layout::{esc, page};
use crate::state::SharedState;
use crate::views::{app::analyze_collection, ViewSnapshot};

#[derive(Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub collection: String,
}

pub async fn app_page(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> (CookieJar, Html<String>) {
    let (session, jar) = state.sessions.resolve(jar).await;
    (jar, Html(render_app_page(&state.config, &session.app_view.snapshot())))
}

pub async fn app_analyze(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<AnalyzeForm>,
) -> (CookieJar, Html<String>) {
    let (session, jar) = state.sessions.resolve(jar).await;
    match CollectionName::parse_optional(&form.collection) {
        Some(collection) => {
            analyze_collection(&state, &session, collection).await;
        }
        None => warn!("Analyze request without a collection name, ignoring"),
    }
    (jar, Html(render_app_page(&state.config, &session.app_view.snapshot())))
}

pub fn render_app_page(config: &Config, snap: &ViewSnapshot) -> String {
    let buttons: String = config.presets.iter().map(|p| format!(
        r#"
        <form method="POST" action="/analyze" class="inline-form" data-loading-form>
            <input type="hidden" name="collection" value="{}">
            <button type="submit" class="btn btn-primary">{}</button>
        </form>"#,
        esc(&p.name), esc(&p.label)
    )).collect();

    let loader_hidden = if snap.loading { "" } else { " hidden" };

    let results_html = match &snap.results {
        None => String::new(),
        Some(result) => format!(r#"
    <div class="results">
        {}
        <div class="sections">
            <h2>Key Sections</h2>
            {}
        </div>
    </div>"#,
            render_knowledge_graph(result, config.graph.max_nodes),
            render_section_cards(result)),
    };

    let body = format!(r#"
    <div class="page-header">
        <h1 class="page-title">PDF Knowledge Connect</h1>
    </div>
    <div class="controls">{}
    </div>
    <div class="loader" data-loader="app"{}>Analyzing...</div>
    {}"#, buttons, loader_hidden, results_html);

    page("Collections", "app", &body, "")
}

fn render_section_cards(result: &AnalysisResult) -> String {
    result.sections.iter().enumerate().map(|(i, s)| format!(
        r#"
            <div class="section-card" data-section-index="{}">
                <h3>{}</h3>
                <p>Document: {} | Page: {}</p>
            </div>"#,
        i, esc(&s.text), esc(&s.document), s.page
    )).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfconnect_common::Section;

    fn snap_with(result: Option<AnalysisResult>, loading: bool) -> ViewSnapshot {
        ViewSnapshot { loading, results: result, ..ViewSnapshot::default() }
    }

    #[test]
    fn test_buttons_follow_presets() {
        let html = render_app_page(&Config::default(), &ViewSnapshot::default());
        assert!(html.contains("Analyze Travel Docs"));
        assert!(html.contains("Analyze HR Docs"));
        assert!(html.contains("Analyze Recipes"));
        assert!(html.contains(r#"value="acrobat_learning""#));
        assert!(!html.contains(r#"class="results""#));
    }

    #[test]
    fn test_loader_only_while_loading() {
        let idle = render_app_page(&Config::default(), &snap_with(None, false));
        assert!(idle.contains(r#"data-loader="app" hidden>"#));

        let busy = render_app_page(&Config::default(), &snap_with(None, true));
        assert!(busy.contains(r#"data-loader="app">Analyzing..."#));
    }

    #[test]
    fn test_empty_sections_render_no_cards() {
        let html = render_app_page(&Config::default(), &snap_with(Some(AnalysisResult::default()), false));
        assert!(html.contains("Key Sections"));
        assert_eq!(html.matches("data-section-index=").count(), 0);
    }

    #[test]
    fn test_cards_in_response_order() {
        let section = |t: &str, d: &str, p: u32| Section {
            text: t.into(), document: d.into(), page: p, importance: None, is_uploaded: None,
        };
        let result = AnalysisResult {
            sections: vec![section("Packing List", "trip.pdf", 2), section("Budget", "money.pdf", 9)],
            connections: Vec::new(),
        };
        let html = render_app_page(&Config::default(), &snap_with(Some(result), false));

        assert_eq!(html.matches("data-section-index=").count(), 2);
        let first = html.find("<h3>Packing List</h3>").unwrap();
        let second = html.find("<h3>Budget</h3>").unwrap();
        assert!(first < second);
        assert!(html.contains("Document: trip.pdf | Page: 2"));
        assert!(html.contains("Document: money.pdf | Page: 9"));
    }

    #[test]
    fn test_section_text_is_escaped() {
        let result = AnalysisResult {
            sections: vec![Section {
                text: "<script>alert(1)</script>".into(),
                document: "a&b.pdf".into(),
                page: 1,
                importance: None,
                is_uploaded: None,
            }],
            connections: Vec::new(),
        };
        let html = render_app_page(&Config::default(), &snap_with(Some(result), false));

        assert!(html.contains("<h3>&lt;script&gt;alert(1)&lt;/script&gt;</h3>"));
        assert!(html.contains("Document: a&amp;b.pdf"));
        assert!(!html.contains("<script>alert(1)"));
    }
}
