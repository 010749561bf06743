//! Error types for session storage and the visit lifecycle.

use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Failure modes of resolving, mutating and persisting a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The document store could not be reached, or a read/write failed.
    ///
    /// Never retried inline.
    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    /// The session cookie could not be authenticated or decoded.
    ///
    /// Recoverable: the adapter treats the cookie as absent.
    #[error("Malformed session cookie: {0}")]
    MalformedCookie(String),

    /// A stored record does not have the expected shape.
    ///
    /// Surfaced as-is so an incompatible record is never silently reset.
    #[error("Corrupt session state: {0}")]
    CorruptSessionState(String),

    /// Invalid startup configuration (key material, store URL).
    #[error("Invalid session configuration: {0}")]
    Configuration(String),
}

impl SessionError {
    /// Returns `true` if the request can proceed as if no cookie was sent.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hello_views_session::SessionError;
    /// assert!(SessionError::MalformedCookie("bad base64".into()).is_recoverable());
    /// assert!(!SessionError::StoreUnavailable("timeout".into()).is_recoverable());
    /// ```
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedCookie(_))
    }

    /// Short machine-readable label, used for metrics and log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::MalformedCookie(_) => "malformed_cookie",
            Self::CorruptSessionState(_) => "corrupt",
            Self::Configuration(_) => "configuration",
        }
    }
}
