//! pdfconnect-common: shared wire types and errors used across all PDF Knowledge Connect crates.

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{ApiError, PdfConnectError, Result};
pub use types::{AnalysisResult, AnalyzeCollectionRequest, CollectionName, Connection, Section};
