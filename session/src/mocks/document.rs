//! Mock document backend for testing.

use crate::error::{Result, SessionError};
use crate::providers::DocumentBackend;
use crate::state::{SessionDocument, SessionId};
use chrono::Duration;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock document backend.
///
/// Keeps raw JSON per session in memory, like Redis would, and can
/// simulate an outage.
#[derive(Debug, Clone, Default)]
pub struct MockDocumentBackend {
    records: Arc<Mutex<HashMap<SessionId, String>>>,
    unavailable: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MockDocumentBackend {
    /// Create an empty, reachable backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate (or end) a store outage. Affects loads and saves.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Store a raw record, bypassing validation.
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned.
    pub fn insert_raw(&self, id: SessionId, json: impl Into<String>) -> Result<()> {
        lock(&self.records)?.insert(id, json.into());
        Ok(())
    }

    /// Parsed record for a session, if any.
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned or the record is corrupt.
    pub fn document(&self, id: SessionId) -> Result<Option<SessionDocument>> {
        lock(&self.records)?
            .get(&id)
            .map(|raw| SessionDocument::from_json(raw))
            .transpose()
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(lock(&self.records)?.len())
    }

    /// Returns `true` if no records are stored.
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of successful saves.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SessionError::StoreUnavailable(
                "simulated outage".to_string(),
            ));
        }
        Ok(())
    }
}

fn lock(
    records: &Mutex<HashMap<SessionId, String>>,
) -> Result<std::sync::MutexGuard<'_, HashMap<SessionId, String>>> {
    records
        .lock()
        .map_err(|_| SessionError::StoreUnavailable("Mutex lock failed".to_string()))
}

impl DocumentBackend for MockDocumentBackend {
    fn load(&self, id: SessionId) -> impl Future<Output = Result<Option<SessionDocument>>> + Send {
        let result = self.check_available().and_then(|()| self.document(id));
        async move { result }
    }

    fn save(
        &self,
        id: SessionId,
        document: &SessionDocument,
        _ttl: Duration,
    ) -> impl Future<Output = Result<()>> + Send {
        let result = self
            .check_available()
            .and_then(|()| document.to_json())
            .and_then(|json| self.insert_raw(id, json))
            .map(|()| {
                self.writes.fetch_add(1, Ordering::SeqCst);
            });
        async move { result }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn document(views: f64) -> SessionDocument {
        SessionDocument {
            views,
            greeting: "Hello World".into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let backend = MockDocumentBackend::new();
        let id = SessionId::new();

        backend.save(id, &document(2.0), Duration::days(1)).await.unwrap();

        assert_eq!(backend.load(id).await.unwrap(), Some(document(2.0)));
        assert_eq!(backend.write_count(), 1);
        assert_eq!(backend.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_record_is_none() {
        let backend = MockDocumentBackend::new();
        assert!(backend.load(SessionId::new()).await.unwrap().is_none());
        assert!(backend.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_outage_fails_both_operations() {
        let backend = MockDocumentBackend::new();
        backend.set_unavailable(true);

        assert!(matches!(
            backend.load(SessionId::new()).await,
            Err(SessionError::StoreUnavailable(_))
        ));
        assert!(matches!(
            backend.save(SessionId::new(), &document(1.0), Duration::days(1)).await,
            Err(SessionError::StoreUnavailable(_))
        ));

        backend.set_unavailable(false);
        assert!(backend.load(SessionId::new()).await.is_ok());
    }
}
