//! Per-client conversation state, keyed by a session cookie.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use log::debug;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;
use uuid::Uuid;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "assistant_session";

/// Conversation state of one client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Waiting for a read-out/summarize choice after an upload
    pub pending_document: bool,
    /// Text extracted from the last uploaded document
    pub document_content: String,
    /// Topic of the last Wikipedia lookup
    pub wiki_topic: Option<String>,
    /// Sentence offset of the current Wikipedia page
    pub wiki_offset: usize,
}

impl Session {
    /// Store freshly extracted document text and wait for the user's choice.
    pub fn store_document(&mut self, content: String) {
        self.document_content = content;
        self.pending_document = true;
    }

    /// Leave the document flow, returning the stored text.
    pub fn take_document(&mut self) -> String {
        self.pending_document = false;
        self.document_content.clone()
    }
}

/// Sessions idle longer than this are dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct Entry {
    session: Arc<Mutex<Session>>,
    last_seen: Instant,
}

#[derive(Debug)]
struct Sessions {
    entries: HashMap<String, Entry>,
    last_sweep: Instant,
}

impl Sessions {
    /// Drops idle entries that no request is holding.
    fn sweep(&mut self, now: Instant, idle_ttl: Duration) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            Arc::strong_count(&entry.session) > 1
                || now.duration_since(entry.last_seen) < idle_ttl
        });
        self.last_sweep = now;

        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(
                "Evicted {} idle sessions, {} remain",
                evicted,
                self.entries.len()
            );
        }
    }
}

/// In-memory session records shared by all requests.
///
/// Each session has its own lock, held by a request for as long as it works
/// on that session, so two requests for one client never interleave.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<Sessions>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Sessions {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
            })),
            idle_ttl,
        }
    }

    /// Locks the session for the caller, creating it for unknown ids.
    ///
    /// Idle sessions are swept at most once per idle period.
    pub async fn acquire(&self, id: &str) -> OwnedMutexGuard<Session> {
        let session = {
            let mut inner = self.inner.lock().await;
            let now = Instant::now();
            if now.duration_since(inner.last_sweep) >= self.idle_ttl {
                inner.sweep(now, self.idle_ttl);
            }

            let entry = inner
                .entries
                .entry(id.to_string())
                .or_insert_with(|| Entry {
                    session: Arc::default(),
                    last_seen: now,
                });
            entry.last_seen = now;
            Arc::clone(&entry.session)
        };
        session.lock_owned().await
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Reads the session id from the cookie jar, issuing a new one when absent.
pub fn resolve_session_id(jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(SESSION_COOKIE)
        && Uuid::parse_str(cookie.value()).is_ok()
    {
        let id = cookie.value().to_string();
        return (jar, id);
    }

    let id = Uuid::new_v4().to_string();
    debug!("Issuing new session {id}");

    let mut cookie = Cookie::new(SESSION_COOKIE, id.clone());
    cookie.set_http_only(true);
    cookie.set_same_site(Some(SameSite::Lax));
    cookie.set_path("/");
    (jar.add(cookie), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_document_clears_pending_flag_but_keeps_text() {
        let mut session = Session::default();
        session.store_document("hello world".to_string());
        assert!(session.pending_document);

        assert_eq!(session.take_document(), "hello world");
        assert!(!session.pending_document);
        assert_eq!(session.document_content, "hello world");
    }

    #[tokio::test]
    async fn unknown_id_yields_fresh_session() {
        let store = SessionStore::default();
        assert!(store.is_empty().await);
        assert_eq!(*store.acquire("missing").await, Session::default());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn changes_persist_between_acquisitions() {
        let store = SessionStore::default();
        {
            let mut session = store.acquire("abc").await;
            session.wiki_topic = Some("cats".to_string());
            session.wiki_offset = 2;
        }
        let session = store.acquire("abc").await;
        assert_eq!(session.wiki_topic.as_deref(), Some("cats"));
        assert_eq!(session.wiki_offset, 2);
    }

    #[tokio::test]
    async fn second_request_waits_for_the_first() {
        let store = SessionStore::default();
        let first = store.acquire("abc").await;

        let waiting = {
            let store = store.clone();
            tokio::spawn(async move {
                let mut session = store.acquire("abc").await;
                session.store_document("uploaded".to_string());
            })
        };
        tokio::task::yield_now().await;
        assert!(!waiting.is_finished());

        drop(first);
        waiting.await.expect("task");
        assert!(store.acquire("abc").await.pending_document);
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted() {
        let store = SessionStore::new(Duration::ZERO);
        for i in 0..100 {
            drop(store.acquire(&format!("client-{i}")).await);
        }
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn sessions_in_use_are_kept() {
        let store = SessionStore::new(Duration::ZERO);
        let held = store.acquire("busy").await;
        drop(store.acquire("other").await);
        assert_eq!(store.len().await, 2);
        drop(held);
    }

    #[tokio::test]
    async fn recent_sessions_survive_a_sweep() {
        let store = SessionStore::new(Duration::from_secs(3600));
        for i in 0..10 {
            drop(store.acquire(&format!("client-{i}")).await);
        }
        assert_eq!(store.len().await, 10);
    }

    #[test]
    fn missing_cookie_issues_new_id() {
        let (jar, id) = resolve_session_id(CookieJar::new());
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(jar.get(SESSION_COOKIE).map(|c| c.value()), Some(id.as_str()));
    }

    #[test]
    fn valid_cookie_is_reused() {
        let existing = Uuid::new_v4().to_string();
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, existing.clone()));
        let (_, id) = resolve_session_id(jar);
        assert_eq!(id, existing);
    }

    #[test]
    fn malformed_cookie_is_replaced() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "not-a-uuid"));
        let (_, id) = resolve_session_id(jar);
        assert_ne!(id, "not-a-uuid");
    }
}
