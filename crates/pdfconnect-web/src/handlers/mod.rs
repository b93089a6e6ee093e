//! HTTP handlers for all web routes.

pub mod analyzer;
pub mod api;
pub mod app;
pub mod layout;
