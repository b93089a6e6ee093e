//! pdfconnect-test-utils: fixtures and a fake analysis backend for tests.

pub mod backend;
pub mod fixtures;

pub use backend::MockAnalysisBackend;
