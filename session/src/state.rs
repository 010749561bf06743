//! Session types.
//!
//! The core works with the typed [`VisitValues`] record only. The document
//! representation ([`SessionDocument`]) stores `views` as a float, the
//! document store's native number type, and is converted exactly once at
//! the adapter boundary.

use crate::error::{Result, SessionError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    /// Generate a new random `SessionId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Per-session values used by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitValues {
    /// Number of page views in this session.
    pub views: u64,
    /// Greeting assigned when the session was created.
    pub greeting: String,
}

/// A resolved session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Identifier carried by the session cookie.
    pub id: SessionId,
    /// `true` only during the request that created the session. Never persisted.
    pub is_new: bool,
    /// Current values. Empty for a new session until a visit is applied.
    pub values: VisitValues,
    /// When the backing record was first written, if it exists yet.
    pub created_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Start a brand new session with a fresh identifier.
    #[must_use]
    pub fn fresh() -> Self {
        Self {
            id: SessionId::new(),
            is_new: true,
            values: VisitValues::default(),
            created_at: None,
        }
    }

    /// Rebuild an existing session from its stored document.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::CorruptSessionState`] if the document's
    /// values do not convert to [`VisitValues`].
    pub fn from_document(id: SessionId, document: SessionDocument) -> Result<Self> {
        let created_at = document.created_at;
        Ok(Self {
            id,
            is_new: false,
            values: VisitValues::try_from(document)?,
            created_at,
        })
    }

    /// Build the document to write for this session.
    #[must_use]
    pub fn to_document(&self, now: DateTime<Utc>) -> SessionDocument {
        // u64 -> f64 is exact for any count a browser will ever reach.
        #[allow(clippy::cast_precision_loss)]
        let views = self.values.views as f64;

        SessionDocument {
            views,
            greeting: self.values.greeting.clone(),
            created_at: Some(self.created_at.unwrap_or(now)),
            updated_at: Some(now),
        }
    }
}

/// Stored shape of a session record.
///
/// `created_at`/`updated_at` are store metadata and optional on read so
/// records written by other tools still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    /// View counter in the store's native number type.
    pub views: f64,
    /// Assigned greeting.
    pub greeting: String,
    /// First write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Most recent write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SessionDocument {
    /// Parse a raw JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::CorruptSessionState`] if the document is not
    /// valid JSON, or `views`/`greeting` are missing or of the wrong type.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| SessionError::CorruptSessionState(format!("unreadable record: {e}")))
    }

    /// Serialize to JSON for storage.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::CorruptSessionState`] if serialization fails
    /// (only possible for non-finite `views`).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| SessionError::CorruptSessionState(format!("unwritable record: {e}")))
    }
}

impl TryFrom<SessionDocument> for VisitValues {
    type Error = SessionError;

    fn try_from(document: SessionDocument) -> Result<Self> {
        let views = document.views;
        if !views.is_finite() || views < 0.0 || views.fract() != 0.0 {
            return Err(SessionError::CorruptSessionState(format!(
                "views must be a non-negative whole number, found {views}"
            )));
        }
        // 2^64 as f64; anything at or above cannot be a counter value.
        if views >= 18_446_744_073_709_551_616.0 {
            return Err(SessionError::CorruptSessionState(format!(
                "views out of range: {views}"
            )));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let views = views as u64;

        Ok(Self {
            views,
            greeting: document.greeting,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_is_new_and_empty() {
        let session = Session::fresh();
        assert!(session.is_new);
        assert_eq!(session.values, VisitValues::default());
        assert!(session.created_at.is_none());
    }

    #[test]
    fn test_float_views_convert_to_integer() {
        let doc = SessionDocument::from_json(r#"{"views":3.0,"greeting":"Ciao Mondo"}"#).unwrap();
        let values = VisitValues::try_from(doc).unwrap();
        assert_eq!(values.views, 3);
        assert_eq!(values.greeting, "Ciao Mondo");
    }

    #[test]
    fn test_integer_literal_views_accepted() {
        let doc = SessionDocument::from_json(r#"{"views":7,"greeting":"Hola Mundo"}"#).unwrap();
        assert_eq!(VisitValues::try_from(doc).unwrap().views, 7);
    }

    #[test]
    fn test_string_views_is_corrupt() {
        let err = SessionDocument::from_json(r#"{"views":"3","greeting":"Hola Mundo"}"#)
            .unwrap_err();
        assert!(matches!(err, SessionError::CorruptSessionState(_)));
    }

    #[test]
    fn test_missing_greeting_is_corrupt() {
        let err = SessionDocument::from_json(r#"{"views":1.0}"#).unwrap_err();
        assert!(matches!(err, SessionError::CorruptSessionState(_)));
    }

    #[test]
    fn test_fractional_or_negative_views_is_corrupt() {
        for views in [1.5, -1.0, f64::INFINITY] {
            let doc = SessionDocument {
                views,
                greeting: "Hello World".into(),
                created_at: None,
                updated_at: None,
            };
            assert!(matches!(
                VisitValues::try_from(doc),
                Err(SessionError::CorruptSessionState(_))
            ));
        }
    }

    #[test]
    fn test_document_keeps_creation_time() {
        let created = Utc::now() - chrono::Duration::days(2);
        let session = Session {
            id: SessionId::new(),
            is_new: false,
            values: VisitValues {
                views: 4,
                greeting: "Hallo Welt".into(),
            },
            created_at: Some(created),
        };

        let now = Utc::now();
        let doc = session.to_document(now);

        assert!((doc.views - 4.0).abs() < f64::EPSILON);
        assert_eq!(doc.created_at, Some(created));
        assert_eq!(doc.updated_at, Some(now));
    }

    #[test]
    fn test_document_json_shape() {
        let session = Session {
            values: VisitValues {
                views: 1,
                greeting: "Hello World".into(),
            },
            ..Session::fresh()
        };
        let json = session.to_document(Utc::now()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["views"], serde_json::json!(1.0));
        assert_eq!(value["greeting"], "Hello World");
        assert!(value["created_at"].is_string());
    }
}
