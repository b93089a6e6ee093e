//! Browser sessions.
//!
//! Each browser gets a `pdfconnect_session` cookie holding a random id. The
//! id keys a [`Session`] that owns that browser's App and Analyzer view
//! state. Sessions idle for longer than `server.session_idle_secs` are
//! evicted together with their results.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::state::SessionEvent;
use crate::views::{ViewKind, ViewState};

pub const SESSION_COOKIE: &str = "pdfconnect_session";

/// View state belonging to one browser.
pub struct Session {
    pub id: Uuid,
    pub app_view: ViewState,
    pub analyzer_view: ViewState,
}

impl Session {
    pub fn new(id: Uuid, events: broadcast::Sender<SessionEvent>) -> Self {
        Self {
            id,
            app_view: ViewState::new(ViewKind::App, id, events.clone()),
            analyzer_view: ViewState::new(ViewKind::Analyzer, id, events),
        }
    }

    pub fn view(&self, kind: ViewKind) -> &ViewState {
        match kind {
            ViewKind::App => &self.app_view,
            ViewKind::Analyzer => &self.analyzer_view,
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, Arc<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    pub fn new(idle: Duration, max_sessions: u64, events: broadcast::Sender<SessionEvent>) -> Self {
        let sessions = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle)
            .build();
        Self { sessions, events }
    }

    /// The session for `id`, created empty if unknown or expired.
    pub async fn get_or_create(&self, id: Uuid) -> Arc<Session> {
        let events = self.events.clone();
        self.sessions
            .get_with(id, async move { Arc::new(Session::new(id, events)) })
            .await
    }

    /// Session named by the request's cookie, or a new one. The returned
    /// jar carries the cookie to set when a new id was minted.
    pub async fn resolve(&self, jar: CookieJar) -> (Arc<Session>, CookieJar) {
        match session_id(&jar) {
            Some(id) => {
                if !self.sessions.contains_key(&id) {
                    debug!(session = %id, "Unknown or expired session, starting empty");
                }
                (self.get_or_create(id).await, jar)
            }
            None => {
                let id = Uuid::new_v4();
                debug!(session = %id, "New browser session");
                let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax);
                (self.get_or_create(id).await, jar.add(cookie))
            }
        }
    }
}

/// Session id carried by the request's cookie, if it parses.
pub fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(idle: Duration) -> SessionStore {
        let (tx, _) = broadcast::channel(16);
        SessionStore::new(idle, 100, tx)
    }

    #[tokio::test]
    async fn test_new_browser_gets_a_cookie() {
        let store = store(Duration::from_secs(60));

        let (session, jar) = store.resolve(CookieJar::new()).await;

        let cookie = jar.get(SESSION_COOKIE).unwrap();
        assert_eq!(cookie.value(), session.id.to_string());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(session_id(&jar), Some(session.id));
    }

    #[tokio::test]
    async fn test_same_cookie_same_session() {
        let store = store(Duration::from_secs(60));
        let (first, jar) = store.resolve(CookieJar::new()).await;

        let (again, _) = store.resolve(jar).await;

        assert!(Arc::ptr_eq(&first, &again));
    }

    #[tokio::test]
    async fn test_garbage_cookie_is_replaced() {
        let store = store(Duration::from_secs(60));
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "not-a-uuid"));

        let (session, jar) = store.resolve(jar).await;

        assert_eq!(jar.get(SESSION_COOKIE).unwrap().value(), session.id.to_string());
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let store = store(Duration::from_millis(200));
        let id = Uuid::new_v4();
        let session = store.get_or_create(id).await;
        session.app_view.replace_collections(vec!["travel_planning".into()]);

        tokio::time::sleep(Duration::from_millis(500)).await;

        let fresh = store.get_or_create(id).await;
        assert!(!Arc::ptr_eq(&session, &fresh));
        assert!(fresh.app_view.snapshot().collections.is_empty());
    }
}
