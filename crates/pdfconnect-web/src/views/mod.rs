//! Per-view state and the request lifecycle shared by both views.
//!
//! Each view runs `idle -> loading -> {success, failure} -> idle` once per
//! request. Requests never wait on one another: every request takes a
//! ticket when it is issued, and a reply is only applied if no newer
//! request's reply has been applied first.

pub mod analyzer;
pub mod app;

use chrono::{DateTime, Utc};
use pdfconnect_common::{AnalysisResult, CollectionName, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::{error, info};
use uuid::Uuid;

use crate::state::{AppEvent, SessionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    App,
    Analyzer,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::App => "app",
            ViewKind::Analyzer => "analyzer",
        }
    }
}

/// What a view renders from. Lives as long as the browser session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewSnapshot {
    pub loading: bool,
    pub results: Option<AnalysisResult>,
    pub collections: Vec<CollectionName>,
    pub selected_collection: Option<CollectionName>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleStatus {
    Success,
    /// Succeeded, but a newer request's results were already showing.
    Superseded,
    Failure,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { sections: usize },
    Superseded,
    Failure { message: String },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }
}

#[derive(Default)]
struct Inner {
    snapshot: ViewSnapshot,
    /// Last ticket handed out.
    issued: u64,
    /// Ticket whose results are showing, 0 when none.
    applied: u64,
    in_flight: usize,
}

pub struct ViewState {
    kind: ViewKind,
    session: Uuid,
    inner: RwLock<Inner>,
    events: broadcast::Sender<SessionEvent>,
}

impl ViewState {
    pub fn new(kind: ViewKind, session: Uuid, events: broadcast::Sender<SessionEvent>) -> Self {
        Self { kind, session, inner: RwLock::new(Inner::default()), events }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.read().snapshot.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().snapshot.loading
    }

    // A panicking writer cannot leave the snapshot half-updated, so poison is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, event: AppEvent) {
        let _ = self.events.send(SessionEvent { session: self.session, event });
    }

    pub fn replace_collections(&self, names: Vec<CollectionName>) {
        self.write().snapshot.collections = names;
    }

    /// Run one backend request through the loading lifecycle.
    ///
    /// On success the response replaces the results unless a newer
    /// request already landed; on failure the error is logged and prior
    /// results stay untouched. Loading is cleared when the last pending
    /// request settles, even if the caller drops this future midway.
    pub async fn run<F>(&self, label: &str, request: F) -> Outcome
    where
        F: Future<Output = Result<AnalysisResult>>,
    {
        self.run_with(label, |_| {}, request).await
    }

    /// Like [`run`](Self::run), with `on_issue` applied to the snapshot in
    /// the same write that issues the request's ticket.
    pub async fn run_with<U, F>(&self, label: &str, on_issue: U, request: F) -> Outcome
    where
        U: FnOnce(&mut ViewSnapshot),
        F: Future<Output = Result<AnalysisResult>>,
    {
        let mut guard = LoadingGuard::begin(self, on_issue);

        match request.await {
            Ok(result) => {
                let sections = result.sections.len();
                let applied = {
                    let mut inner = self.write();
                    if guard.ticket > inner.applied {
                        inner.applied = guard.ticket;
                        inner.snapshot.results = Some(result);
                        inner.snapshot.completed_at = Some(Utc::now());
                        true
                    } else {
                        false
                    }
                };

                if applied {
                    info!(
                        view = self.kind.as_str(),
                        request_id = %guard.request_id,
                        sections,
                        "Analysis of {} complete",
                        label
                    );
                    guard.settle(SettleStatus::Success, Some(sections));
                    Outcome::Success { sections }
                } else {
                    info!(
                        view = self.kind.as_str(),
                        request_id = %guard.request_id,
                        "Discarding results for {}: a newer request already landed",
                        label
                    );
                    guard.settle(SettleStatus::Superseded, Some(sections));
                    Outcome::Superseded
                }
            }
            Err(e) => {
                error!(
                    view = self.kind.as_str(),
                    request_id = %guard.request_id,
                    "Analysis failed: {}: {}",
                    label,
                    e
                );
                guard.settle(SettleStatus::Failure, None);
                Outcome::Failure { message: e.to_string() }
            }
        }
    }
}

/// One issued request; dropping it settles the request.
struct LoadingGuard<'a> {
    view: &'a ViewState,
    ticket: u64,
    request_id: Uuid,
    status: SettleStatus,
    sections: Option<usize>,
}

impl<'a> LoadingGuard<'a> {
    fn begin(view: &'a ViewState, on_issue: impl FnOnce(&mut ViewSnapshot)) -> Self {
        let request_id = Uuid::new_v4();
        let ticket = {
            let mut inner = view.write();
            inner.issued += 1;
            inner.in_flight += 1;
            inner.snapshot.loading = true;
            on_issue(&mut inner.snapshot);
            inner.issued
        };
        view.publish(AppEvent::AnalysisStarted {
            view: view.kind,
            request_id: request_id.to_string(),
        });
        Self { view, ticket, request_id, status: SettleStatus::Cancelled, sections: None }
    }

    fn settle(&mut self, status: SettleStatus, sections: Option<usize>) {
        self.status = status;
        self.sections = sections;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let loading = {
            let mut inner = self.view.write();
            inner.in_flight = inner.in_flight.saturating_sub(1);
            inner.snapshot.loading = inner.in_flight > 0;
            inner.snapshot.loading
        };
        self.view.publish(AppEvent::AnalysisSettled {
            view: self.view.kind,
            request_id: self.request_id.to_string(),
            status: self.status,
            sections: self.sections,
            loading,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfconnect_common::PdfConnectError;
    use std::time::Duration;

    fn result_with(texts: &[&str]) -> AnalysisResult {
        let sections = texts
            .iter()
            .map(|t| pdfconnect_common::Section {
                text: t.to_string(),
                document: "doc.pdf".to_string(),
                page: 1,
                importance: None,
                is_uploaded: None,
            })
            .collect();
        AnalysisResult { sections, connections: Vec::new() }
    }

    fn view() -> (ViewState, broadcast::Receiver<SessionEvent>) {
        let (tx, rx) = broadcast::channel(16);
        (ViewState::new(ViewKind::App, Uuid::new_v4(), tx), rx)
    }

    fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<AppEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev.event);
        }
        out
    }

    #[tokio::test]
    async fn test_success_stores_results_and_clears_loading() {
        let (view, mut rx) = view();
        let outcome = view
            .run("travel_planning", async {
                Ok::<_, PdfConnectError>(result_with(&["a", "b"]))
            })
            .await;

        assert_eq!(outcome, Outcome::Success { sections: 2 });
        let snap = view.snapshot();
        assert!(!snap.loading);
        assert_eq!(snap.results.unwrap().sections.len(), 2);
        assert!(snap.completed_at.is_some());

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], AppEvent::AnalysisStarted { view: ViewKind::App, .. }));
        assert!(matches!(
            events[1],
            AppEvent::AnalysisSettled {
                status: SettleStatus::Success,
                sections: Some(2),
                loading: false,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_events_carry_the_owning_session() {
        let (tx, mut rx) = broadcast::channel(16);
        let session = Uuid::new_v4();
        let view = ViewState::new(ViewKind::Analyzer, session, tx);

        view.run("x", async { Ok::<_, PdfConnectError>(result_with(&[])) }).await;

        let first = rx.try_recv().unwrap();
        assert_eq!(first.session, session);
        assert_eq!(first.event.view(), ViewKind::Analyzer);
    }

    #[tokio::test]
    async fn test_failure_keeps_prior_results() {
        let (view, mut rx) = view();
        view.run("first", async { Ok::<_, PdfConnectError>(result_with(&["kept"])) })
            .await;
        drain(&mut rx);

        let outcome = view
            .run("second", async {
                Err::<AnalysisResult, _>(PdfConnectError::Backend {
                    status: 500,
                    message: "boom".into(),
                })
            })
            .await;

        assert!(outcome.is_failure());
        let snap = view.snapshot();
        assert!(!snap.loading);
        assert_eq!(snap.results.unwrap().sections[0].text, "kept");

        let events = drain(&mut rx);
        let settled = events
            .iter()
            .filter(|e| matches!(e, AppEvent::AnalysisSettled { .. }))
            .count();
        assert_eq!(settled, 1);
    }

    #[tokio::test]
    async fn test_loading_is_visible_while_in_flight() {
        let (view, _rx) = view();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let run = view.run("slow", async move {
            let _ = release_rx.await;
            Ok::<_, PdfConnectError>(result_with(&[]))
        });
        tokio::pin!(run);

        // Poll once so the request starts, then inspect.
        assert!(futures_poll_once(run.as_mut()).await.is_none());
        assert!(view.is_loading());

        release_tx.send(()).unwrap();
        run.await;
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn test_dropped_request_still_clears_loading() {
        let (view, mut rx) = view();
        {
            let run = view.run("abandoned", std::future::pending::<Result<AnalysisResult>>());
            tokio::pin!(run);
            assert!(futures_poll_once(run.as_mut()).await.is_none());
            assert!(view.is_loading());
        }
        assert!(!view.is_loading());
        let events = drain(&mut rx);
        assert!(matches!(
            events.last(),
            Some(AppEvent::AnalysisSettled { status: SettleStatus::Cancelled, .. })
        ));
    }

    #[tokio::test]
    async fn test_late_reply_from_older_request_is_discarded() {
        let (view, _rx) = view();

        let slow = view.run("first", async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, PdfConnectError>(result_with(&["first"]))
        });
        let fast = view.run("second", async { Ok::<_, PdfConnectError>(result_with(&["second"])) });
        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(slow, Outcome::Superseded);
        assert_eq!(fast, Outcome::Success { sections: 1 });
        let snap = view.snapshot();
        assert_eq!(snap.results.unwrap().sections[0].text, "second");
        assert!(!snap.loading);
    }

    #[tokio::test]
    async fn test_hung_request_does_not_block_the_next_one() {
        let (view, mut rx) = view();

        let hung = view.run("hung", std::future::pending::<Result<AnalysisResult>>());
        tokio::pin!(hung);
        assert!(futures_poll_once(hung.as_mut()).await.is_none());

        let next = tokio::time::timeout(
            Duration::from_secs(2),
            view.run("recipe_collection", async {
                Ok::<_, PdfConnectError>(result_with(&["recipes"]))
            }),
        )
        .await
        .expect("second request must not wait on the hung one");

        assert_eq!(next, Outcome::Success { sections: 1 });
        // The hung request is still pending, so the loader stays up.
        assert!(view.is_loading());
        let settled = drain(&mut rx);
        assert!(matches!(
            settled.last(),
            Some(AppEvent::AnalysisSettled { loading: true, .. })
        ));
    }

    #[tokio::test]
    async fn test_on_issue_runs_when_the_request_is_issued() {
        let (view, _rx) = view();

        view.run_with(
            "travel_planning",
            |snap| snap.selected_collection = Some("travel_planning".into()),
            async {
                Err::<AnalysisResult, _>(PdfConnectError::Config("unreachable".into()))
            },
        )
        .await;

        let snap = view.snapshot();
        assert_eq!(snap.selected_collection, Some("travel_planning".into()));
        assert!(snap.results.is_none());
    }

    /// Poll a future exactly once.
    async fn futures_poll_once<F: Future + Unpin>(fut: F) -> Option<F::Output> {
        let mut fut = fut;
        std::future::poll_fn(|cx| {
            std::task::Poll::Ready(match std::pin::Pin::new(&mut fut).poll(cx) {
                std::task::Poll::Ready(v) => Some(v),
                std::task::Poll::Pending => None,
            })
        })
        .await
    }
}
