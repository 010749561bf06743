//! Cookie-keyed session store over a document backend.
//!
//! # Example
//!
//! ```no_run
//! use hello_views_session::cookie::SessionCookieCodec;
//! use hello_views_session::stores::{DocumentSessionStore, RedisDocumentBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = RedisDocumentBackend::new("redis://127.0.0.1:6379").await?;
//! let codec = SessionCookieCodec::new(&[0u8; 32], chrono::Duration::days(30))?;
//! let store = DocumentSessionStore::new(backend, codec);
//! # Ok(())
//! # }
//! ```

use crate::constants::SESSION_COOKIE_NAME;
use crate::cookie::{find_cookie, set_session_cookie, SessionCookieCodec};
use crate::error::Result;
use crate::providers::{DocumentBackend, SessionStore};
use crate::state::Session;
use chrono::Utc;
use http::HeaderMap;

/// [`SessionStore`] that keeps session values in a [`DocumentBackend`]
/// and the session identifier in an encrypted cookie.
#[derive(Debug, Clone)]
pub struct DocumentSessionStore<B> {
    backend: B,
    codec: SessionCookieCodec,
}

impl<B: DocumentBackend> DocumentSessionStore<B> {
    /// Create a store over `backend`, issuing cookies with `codec`.
    #[must_use]
    pub const fn new(backend: B, codec: SessionCookieCodec) -> Self {
        Self { backend, codec }
    }

    /// The underlying document backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The cookie codec.
    #[must_use]
    pub const fn codec(&self) -> &SessionCookieCodec {
        &self.codec
    }

    fn start_session(reason: &'static str) -> Session {
        let session = Session::fresh();
        tracing::debug!(session_id = %session.id, reason, "Starting new session");
        session
    }
}

impl<B: DocumentBackend> SessionStore for DocumentSessionStore<B> {
    async fn resolve(&self, request_headers: &HeaderMap) -> Result<Session> {
        let Some(value) = find_cookie(request_headers, SESSION_COOKIE_NAME) else {
            return Ok(Self::start_session("no cookie"));
        };

        let id = match self.codec.decode(value, Utc::now()) {
            Ok(id) => id,
            Err(e) if e.is_recoverable() => {
                tracing::debug!(error = %e, "Ignoring unusable session cookie");
                return Ok(Self::start_session("malformed cookie"));
            }
            Err(e) => return Err(e),
        };

        match self.backend.load(id).await? {
            Some(document) => {
                let session = Session::from_document(id, document)?;
                tracing::debug!(
                    session_id = %session.id,
                    views = session.values.views,
                    "Loaded session"
                );
                Ok(session)
            }
            // A vanished record never resurrects the client-chosen id.
            None => Ok(Self::start_session("record not found")),
        }
    }

    async fn persist(&self, session: &Session, response_headers: &mut HeaderMap) -> Result<()> {
        let now = Utc::now();
        let token = self.codec.encode(session.id, now)?;
        let document = session.to_document(now);

        self.backend
            .save(session.id, &document, self.codec.max_age())
            .await?;

        set_session_cookie(response_headers, &token, self.codec.max_age())?;

        tracing::debug!(
            session_id = %session.id,
            views = session.values.views,
            "Persisted session"
        );

        Ok(())
    }
}
