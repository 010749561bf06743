//! Application state for Axum handlers.

use hello_views_session::EntropySource;
use std::sync::Arc;

/// State shared by all handlers.
///
/// Holds only immutable handles; nothing here is mutated per request.
pub struct AppState<S> {
    /// Session store used to resolve and persist visits.
    pub sessions: Arc<S>,
    /// Randomness for greeting selection.
    pub entropy: EntropySource,
}

impl<S> AppState<S> {
    /// Create state over a session store, with thread-local randomness.
    #[must_use]
    pub fn new(sessions: S) -> Self {
        Self {
            sessions: Arc::new(sessions),
            entropy: EntropySource::ThreadLocal,
        }
    }

    /// Use a different randomness source (tests pin the greeting this way).
    #[must_use]
    pub const fn with_entropy(mut self, entropy: EntropySource) -> Self {
        self.entropy = entropy;
        self
    }
}

// Manual impl: cloning shares the store and needs no `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            entropy: self.entropy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NotClone;

    #[test]
    fn test_state_is_clone_without_store_clone() {
        let state = AppState::new(NotClone);
        let copy = state.clone();
        assert!(Arc::ptr_eq(&state.sessions, &copy.sessions));
    }

    #[test]
    fn test_with_entropy() {
        let state = AppState::new(NotClone).with_entropy(EntropySource::Fixed(5));
        assert_eq!(state.entropy, EntropySource::Fixed(5));
    }
}
