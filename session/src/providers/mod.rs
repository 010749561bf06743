//! Session providers.
//!
//! Traits for the external dependencies of the session lifecycle. The
//! request handler depends on [`SessionStore`] only; the shipped store is
//! generic over a [`DocumentBackend`], so swapping Redis for another
//! document database or an in-memory map touches nothing above it.
//!
//! ```text
//! Request Handler ──▶ SessionStore (resolve / persist)
//!                          │
//!                          ▼
//!                    DocumentBackend (load / save)
//!                     ├─ RedisDocumentBackend
//!                     └─ MockDocumentBackend (tests)
//! ```

pub mod document;
pub mod session;

pub use document::DocumentBackend;
pub use session::SessionStore;
