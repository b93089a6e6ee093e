//! Knowledge-graph panel: sections as nodes, backend connections as edges,
//! drawn as inline SVG.

use pdfconnect_common::AnalysisResult;
use std::f64::consts::PI;

use crate::handlers::layout::esc;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 420.0;
const MARGIN: f64 = 40.0;
const NODE_RADIUS: f64 = 9.0;

const PALETTE: [&str; 8] = [
    "#3b82f6", "#8b5cf6", "#10b981", "#f59e0b", "#ef4444", "#06b6d4", "#ec4899", "#84cc16",
];

/// Evenly spaced positions on a circle, first node at twelve o'clock.
pub fn circle_layout(n: usize) -> Vec<(f64, f64)> {
    let (cx, cy) = (WIDTH / 2.0, HEIGHT / 2.0);
    if n == 1 {
        return vec![(cx, cy)];
    }
    let r = (WIDTH.min(HEIGHT) / 2.0) - MARGIN;
    (0..n)
        .map(|i| {
            let angle = -PI / 2.0 + 2.0 * PI * (i as f64) / (n as f64);
            (cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect()
}

fn edge_width(strength: f64) -> f64 {
    1.0 + 4.0 * strength.clamp(0.0, 1.0)
}

pub fn render_knowledge_graph(result: &AnalysisResult, max_nodes: usize) -> String {
    if result.sections.is_empty() {
        return r#"<div class="knowledge-graph empty"><p class="text-muted">No sections to connect.</p></div>"#
            .to_string();
    }

    let shown = result.sections.len().min(max_nodes.max(1));
    let positions = circle_layout(shown);
    let documents = result.documents();
    let color_of = |doc: &str| {
        let idx = documents.iter().position(|d| *d == doc).unwrap_or(0);
        PALETTE[idx % PALETTE.len()]
    };

    let edges: String = result
        .connections_within(shown)
        .map(|c| {
            let (x1, y1) = positions[c.source];
            let (x2, y2) = positions[c.target];
            format!(
                r#"<line class="kg-edge" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke-width="{:.2}"><title>strength {:.2}</title></line>"#,
                x1, y1, x2, y2, edge_width(c.strength), c.strength
            )
        })
        .collect();

    let nodes: String = result.sections[..shown]
        .iter()
        .zip(&positions)
        .enumerate()
        .map(|(i, (s, (x, y)))| {
            format!(
                r#"<g class="kg-node" data-index="{}"><circle cx="{:.1}" cy="{:.1}" r="{}" fill="{}"/><title>{} ({}, p. {})</title></g>"#,
                i, x, y, NODE_RADIUS, color_of(&s.document), esc(&s.text), esc(&s.document), s.page
            )
        })
        .collect();

    let legend: String = documents
        .iter()
        .map(|d| {
            format!(
                r#"<li><span class="kg-swatch" style="background:{}"></span>{}</li>"#,
                color_of(d),
                esc(d)
            )
        })
        .collect();

    let note = if shown < result.sections.len() {
        format!(
            r#"<p class="small text-muted">Showing first {} of {} sections.</p>"#,
            shown,
            result.sections.len()
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="knowledge-graph">
    <h2>Knowledge Graph</h2>
    <svg class="kg-canvas" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg" role="img">
        <g class="kg-edges">{}</g>
        <g class="kg-nodes">{}</g>
    </svg>
    <ul class="kg-legend">{}</ul>
    {}
</div>"#,
        WIDTH, HEIGHT, edges, nodes, legend, note
    )
}
