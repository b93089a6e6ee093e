//! Page shell and small HTML helpers shared by both views.

use std::borrow::Cow;

/// Navigation HTML template shared across all pages
pub const NAV_HTML: &str = include_str!("../../templates/nav.html");

/// Escape text for element content and double-quoted attributes.
pub fn esc(s: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(s)
}

/// A JS string literal that is safe to drop inside a `<script>` block.
pub fn js_string(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

pub fn page(title: &str, view: &str, body: &str, tail_script: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{} — PDF Knowledge Connect</title>
    <link rel="stylesheet" href="/static/css/main.css">
</head>
<body data-view="{}">
{}
<main class="main-content">
{}
</main>
<script src="/static/js/main.js"></script>
{}
</body>
</html>"#, esc(title), view, NAV_HTML, body, tail_script)
}
