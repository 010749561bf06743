//! Session store trait.

use crate::error::Result;
use crate::state::Session;
use http::HeaderMap;

/// Session store.
///
/// Maps a request's session cookie to a durable record and writes updates
/// back. Exactly two operations; the cookie format belongs to the
/// implementation.
///
/// # Implementation Notes
///
/// - A missing, undecodable or expired cookie resolves to a fresh session
/// - A cookie naming a record that no longer exists resolves to a fresh
///   session with a new identifier
/// - No locking: concurrent writes for one session are last-write-wins
pub trait SessionStore: Send + Sync {
    /// Resolve the session for a request.
    ///
    /// # Returns
    ///
    /// The loaded session (`is_new = false`), or a fresh one (`is_new = true`).
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The store cannot be reached → `SessionError::StoreUnavailable`
    /// - The stored record has the wrong shape → `SessionError::CorruptSessionState`
    fn resolve(
        &self,
        request_headers: &HeaderMap,
    ) -> impl std::future::Future<Output = Result<Session>> + Send;

    /// Persist a session and set its cookie on the response.
    ///
    /// Issues one write to the store and appends one `Set-Cookie` header.
    /// Nothing is appended to `response_headers` if the write fails.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The write fails → `SessionError::StoreUnavailable`
    fn persist(
        &self,
        session: &Session,
        response_headers: &mut HeaderMap,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
