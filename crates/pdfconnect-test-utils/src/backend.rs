//! wiremock stand-in for the analysis backend.

use pdfconnect_config::BackendConfig;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, header_regex, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const ANALYZE_PATH: &str = "/api/analyze";
pub const COLLECTIONS_PATH: &str = "/api/collections";

pub struct MockAnalysisBackend {
    server: MockServer,
}

impl MockAnalysisBackend {
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig { url: self.uri(), timeout_secs: Some(5) }
    }

    /// JSON `{"collection": name}` analyze call, expected `times` times.
    pub async fn expect_collection_analysis(&self, collection: &str, response: Value, times: u64) {
        Mock::given(method("POST"))
            .and(path(ANALYZE_PATH))
            .and(body_json(json!({ "collection": collection })))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Same as `expect_collection_analysis` but the reply is held back for `delay`.
    pub async fn expect_slow_collection_analysis(
        &self,
        collection: &str,
        response: Value,
        delay: Duration,
    ) {
        Mock::given(method("POST"))
            .and(path(ANALYZE_PATH))
            .and(body_json(json!({ "collection": collection })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(response)
                    .set_delay(delay),
            )
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn expect_upload_analysis(&self, response: Value, times: u64) {
        Mock::given(method("POST"))
            .and(path(ANALYZE_PATH))
            .and(header_regex("content-type", "^multipart/form-data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    pub async fn expect_collections(&self, names: &[&str], times: u64) {
        Mock::given(method("GET"))
            .and(path(COLLECTIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(names)))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Answers exactly one collections listing, then stops matching.
    pub async fn expect_collections_once(&self, names: &[&str]) {
        Mock::given(method("GET"))
            .and(path(COLLECTIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(names)))
            .up_to_n_times(1)
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Every analyze call fails with `status` and the given raw body.
    pub async fn fail_analysis(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(ANALYZE_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    pub async fn fail_collections(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(COLLECTIONS_PATH))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    pub async fn requests_to(&self, http_method: &str, request_path: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .collect()
    }
}

/// Number of multipart parts named `field` in a raw request body.
pub fn count_form_fields(body: &[u8], field: &str) -> usize {
    let needle = format!("name=\"{field}\"");
    String::from_utf8_lossy(body).matches(needle.as_str()).count()
}
