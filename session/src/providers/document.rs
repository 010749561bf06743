//! Document backend trait.

use crate::error::Result;
use crate::state::{SessionDocument, SessionId};
use chrono::Duration;

/// A document database holding one record per session.
pub trait DocumentBackend: Send + Sync {
    /// Load the record for a session.
    ///
    /// # Returns
    ///
    /// `None` if no record exists (never written, or expired by the store).
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The store cannot be reached → `SessionError::StoreUnavailable`
    /// - The record cannot be parsed → `SessionError::CorruptSessionState`
    fn load(
        &self,
        id: SessionId,
    ) -> impl std::future::Future<Output = Result<Option<SessionDocument>>> + Send;

    /// Write (create or replace) the record for a session.
    ///
    /// # Arguments
    ///
    /// - `ttl`: how long the store keeps the record without another write
    ///
    /// # Errors
    ///
    /// Returns error if the write fails → `SessionError::StoreUnavailable`.
    fn save(
        &self,
        id: SessionId,
        document: &SessionDocument,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
