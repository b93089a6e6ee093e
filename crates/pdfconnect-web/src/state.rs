//! Shared application state for the web server.

use pdfconnect_client::{AnalysisBackend, AnalysisClient};
use pdfconnect_common::Result;
use pdfconnect_config::Config;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::session::SessionStore;
use crate::views::{SettleStatus, ViewKind};

/// Events pushed to connected pages via SSE.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// A view sent a request to the analysis backend
    AnalysisStarted { view: ViewKind, request_id: String },
    /// That request finished, failed, or was abandoned
    AnalysisSettled {
        view: ViewKind,
        request_id: String,
        status: SettleStatus,
        sections: Option<usize>,
        /// Whether other requests on the same view are still pending
        loading: bool,
    },
    /// The Analyzer's collection list was re-fetched
    CollectionsRefreshed { count: usize },
}

impl AppEvent {
    /// The view this event belongs to.
    pub fn view(&self) -> ViewKind {
        match self {
            AppEvent::AnalysisStarted { view, .. } | AppEvent::AnalysisSettled { view, .. } => *view,
            AppEvent::CollectionsRefreshed { .. } => ViewKind::Analyzer,
        }
    }

    /// SSE event name; matches the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::AnalysisStarted { .. } => "analysis_started",
            AppEvent::AnalysisSettled { .. } => "analysis_settled",
            AppEvent::CollectionsRefreshed { .. } => "collections_refreshed",
        }
    }
}

/// An event tagged with the browser session it belongs to.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub session: Uuid,
    pub event: AppEvent,
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub config: Config,
    pub backend: Arc<dyn AnalysisBackend>,
    /// Per-browser view state
    pub sessions: SessionStore,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<SessionEvent>,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn AnalysisBackend>) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        let sessions = SessionStore::new(
            config.server.session_idle(),
            config.server.max_sessions,
            event_tx.clone(),
        );
        Self { config, backend, sessions, event_tx }
    }

    /// State talking to the backend named in `config.backend`.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = AnalysisClient::new(&config.backend)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }
}

pub type SharedState = Arc<AppState>;
