//! Storage implementations.
//!
//! - **Document Session Store** - cookie-keyed [`SessionStore`](crate::providers::SessionStore)
//!   over any document backend
//! - **Redis Document Backend** - session records as JSON strings with TTL

pub mod document_redis;
pub mod document_session;

// Re-exports
pub use document_redis::RedisDocumentBackend;
pub use document_session::DocumentSessionStore;
