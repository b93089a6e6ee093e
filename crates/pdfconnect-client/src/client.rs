use async_trait::async_trait;
use pdfconnect_common::{
    AnalysisResult, AnalyzeCollectionRequest, CollectionName, PdfConnectError, Result,
};
use pdfconnect_config::BackendConfig;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::upload::UploadRequest;

const ANALYZE_PATH: &str = "/api/analyze";
const COLLECTIONS_PATH: &str = "/api/collections";

/// The operations the views need from an analysis service.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Analyze one of the backend's predefined collections.
    async fn analyze_collection(&self, collection: &CollectionName) -> Result<AnalysisResult>;

    /// Names of every collection the backend knows about.
    async fn list_collections(&self) -> Result<Vec<CollectionName>>;

    /// Analyze uploaded PDFs, optionally together with a named collection.
    async fn analyze_uploads(&self, request: UploadRequest) -> Result<AnalysisResult>;
}

/// reqwest-backed client for the analysis service.
#[derive(Clone)]
pub struct AnalysisClient {
    base_url: String,
    client: Client,
}

impl AnalysisClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Non-2xx and undecodable bodies are both errors.
    async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(PdfConnectError::from_backend_body(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl AnalysisBackend for AnalysisClient {
    async fn analyze_collection(&self, collection: &CollectionName) -> Result<AnalysisResult> {
        debug!(%collection, "POST {}", ANALYZE_PATH);
        let resp = self
            .client
            .post(self.endpoint(ANALYZE_PATH))
            .json(&AnalyzeCollectionRequest { collection: collection.clone() })
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn list_collections(&self) -> Result<Vec<CollectionName>> {
        debug!("GET {}", COLLECTIONS_PATH);
        let resp = self.client.get(self.endpoint(COLLECTIONS_PATH)).send().await?;
        Self::read_json(resp).await
    }

    async fn analyze_uploads(&self, request: UploadRequest) -> Result<AnalysisResult> {
        debug!(
            files = request.files.len(),
            collection = ?request.collection,
            "POST {} (multipart)",
            ANALYZE_PATH
        );
        let form = request.into_form()?;
        let resp = self
            .client
            .post(self.endpoint(ANALYZE_PATH))
            .multipart(form)
            .send()
            .await?;
        Self::read_json(resp).await
    }
}
