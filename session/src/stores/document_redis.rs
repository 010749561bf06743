//! Redis-based document backend.
//!
//! Session records are stored as JSON strings:
//!
//! - **Key**: `hello-views:session:{session_id}`
//! - **Value**: `{"views": 3.0, "greeting": "...", "created_at": ..., "updated_at": ...}`
//! - **TTL**: refreshed on every write (sliding expiration)
//!
//! # Example
//!
//! ```no_run
//! use hello_views_session::stores::RedisDocumentBackend;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = RedisDocumentBackend::new("redis://127.0.0.1:6379").await?;
//! # Ok(())
//! # }
//! ```

use crate::constants::RECORD_KEY_PREFIX;
use crate::error::{Result, SessionError};
use crate::providers::DocumentBackend;
use crate::state::{SessionDocument, SessionId};
use chrono::Duration;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

/// Redis-backed session documents with TTL-based expiration.
///
/// Cloning is cheap: clones share the multiplexed connection.
#[derive(Clone)]
pub struct RedisDocumentBackend {
    /// Connection manager (reconnects automatically).
    conn_manager: ConnectionManager,
}

impl RedisDocumentBackend {
    /// Connect to Redis.
    ///
    /// # Arguments
    ///
    /// * `redis_url` - Redis connection URL (e.g., "redis://127.0.0.1:6379")
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Configuration`] if the URL is invalid and
    /// [`SessionError::StoreUnavailable`] if the connection fails.
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            SessionError::Configuration(format!("Failed to create Redis client: {e}"))
        })?;

        let conn_manager = ConnectionManager::new(client).await.map_err(|e| {
            SessionError::StoreUnavailable(format!(
                "Failed to create Redis connection manager: {e}"
            ))
        })?;

        Ok(Self { conn_manager })
    }

    /// Get the Redis key for a session record.
    fn record_key(id: SessionId) -> String {
        format!("{RECORD_KEY_PREFIX}{}", id.0)
    }
}

impl DocumentBackend for RedisDocumentBackend {
    async fn load(&self, id: SessionId) -> Result<Option<SessionDocument>> {
        let mut conn = self.conn_manager.clone();
        let key = Self::record_key(id);

        let raw: Option<String> = conn.get(&key).await.map_err(|e| {
            SessionError::StoreUnavailable(format!("Failed to get session from Redis: {e}"))
        })?;

        raw.as_deref().map(SessionDocument::from_json).transpose()
    }

    async fn save(&self, id: SessionId, document: &SessionDocument, ttl: Duration) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let key = Self::record_key(id);
        let json = document.to_json()?;

        #[allow(clippy::cast_sign_loss)]
        let ttl_seconds = ttl.num_seconds().max(1) as u64;

        let _: () = conn.set_ex(&key, json, ttl_seconds).await.map_err(|e| {
            SessionError::StoreUnavailable(format!("Failed to write session to Redis: {e}"))
        })?;

        tracing::debug!(
            session_id = %id,
            ttl_seconds = ttl_seconds,
            "Wrote session document with refreshed TTL"
        );

        Ok(())
    }
}
