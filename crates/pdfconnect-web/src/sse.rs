//! Server-Sent Events (SSE) streaming of loading events.

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum_extra::extract::cookie::CookieJar;
use futures_core::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use crate::state::{SessionEvent, SharedState};
use crate::views::ViewKind;

#[derive(Debug, Default, Deserialize)]
pub struct EventQuery {
    /// Only forward events for this view; all views when absent.
    pub view: Option<ViewKind>,
}

/// Which events one subscriber receives: its own session's, optionally one view.
#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub session: Uuid,
    pub view: Option<ViewKind>,
}

impl EventFilter {
    pub fn accepts(&self, event: &SessionEvent) -> bool {
        event.session == self.session
            && self.view.map_or(true, |wanted| event.event.view() == wanted)
    }
}

/// SSE endpoint. Pages subscribe here to show and hide their loader.
pub async fn sse_handler(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(query): Query<EventQuery>,
) -> (CookieJar, Sse<impl Stream<Item = Result<Event, Infallible>>>) {
    let (session, jar) = state.sessions.resolve(jar).await;
    let filter = EventFilter { session: session.id, view: query.view };
    let rx = state.subscribe();
    // Lagged receivers skip the missed events instead of closing the stream.
    let stream = BroadcastStream::new(rx).filter_map(move |result| {
        let scoped = result.ok().filter(|e| filter.accepts(e))?;
        let data = serde_json::to_string(&scoped.event).ok()?;
        Some(Ok(Event::default().event(scoped.event.name()).data(data)))
    });

    let sse = Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    );
    (jar, sse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppEvent;
    use crate::views::SettleStatus;

    fn scoped(session: Uuid, event: AppEvent) -> SessionEvent {
        SessionEvent { session, event }
    }

    #[test]
    fn test_filter_by_session_and_view() {
        let mine = Uuid::new_v4();
        let theirs = Uuid::new_v4();
        let started = AppEvent::AnalysisStarted { view: ViewKind::App, request_id: "r1".into() };
        let refreshed = AppEvent::CollectionsRefreshed { count: 3 };

        let app_only = EventFilter { session: mine, view: Some(ViewKind::App) };
        assert!(app_only.accepts(&scoped(mine, started.clone())));
        assert!(!app_only.accepts(&scoped(mine, refreshed.clone())));
        assert!(!app_only.accepts(&scoped(theirs, started)));

        let every_view = EventFilter { session: mine, view: None };
        assert!(every_view.accepts(&scoped(mine, refreshed.clone())));
        assert!(!every_view.accepts(&scoped(theirs, refreshed)));
    }

    #[test]
    fn test_event_wire_format() {
        let settled = AppEvent::AnalysisSettled {
            view: ViewKind::Analyzer,
            request_id: "r2".into(),
            status: SettleStatus::Failure,
            sections: None,
            loading: false,
        };
        let json: serde_json::Value = serde_json::to_value(&settled).unwrap();
        assert_eq!(json["type"], "analysis_settled");
        assert_eq!(json["view"], "analyzer");
        assert_eq!(json["status"], "failure");
        assert_eq!(json["loading"], false);
        assert_eq!(settled.name(), "analysis_settled");
    }
}
