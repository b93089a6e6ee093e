//! pdfconnect-client: HTTP client for the external PDF analysis backend.
//!
//! The backend owns all PDF parsing, ranking and graph construction; this
//! crate only speaks its request/response contract:
//!   - `POST /api/analyze` with `{"collection": ...}`
//!   - `POST /api/analyze` with a multipart body of `files` (+ `collection`)
//!   - `GET  /api/collections`

pub mod client;
pub mod upload;

pub use client::{AnalysisBackend, AnalysisClient};
pub use upload::{UploadFile, UploadRequest};
