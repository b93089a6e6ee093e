//! pdfconnect-web: web front-end for the PDF analysis service.
//! Provides two pages, each backed by view state kept per browser session:
//!   - App: one-click analysis of preset collections, knowledge graph + key sections
//!   - Analyzer: collection picker and PDF upload form
//! plus JSON endpoints and an SSE feed of loading events.

pub mod graph;
pub mod handlers;
pub mod router;
pub mod session;
pub mod sse;
pub mod state;
pub mod views;
