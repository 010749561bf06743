//! # hello-views Sessions
//!
//! Cookie-identified, document-backed sessions and the visit lifecycle
//! they carry.
//!
//! ## Architecture
//!
//! ```text
//! Cookie ──▶ SessionStore::resolve ──▶ lifecycle::apply_visit ──▶ SessionStore::persist ──▶ Set-Cookie
//!               (I/O, adapter)              (pure)                     (I/O, adapter)
//! ```
//!
//! - [`providers`]: the `SessionStore` and `DocumentBackend` seams
//! - [`stores`]: the cookie-keyed store and the Redis backend
//! - [`lifecycle`]: creation-vs-mutation policy, no I/O
//! - [`cookie`]: the encrypted cookie format
//!
//! ## Example
//!
//! ```rust,ignore
//! use hello_views_session::{lifecycle, providers::SessionStore};
//!
//! let session = store.resolve(request.headers()).await?;
//! let session = lifecycle::apply_visit(session, &mut rand::thread_rng())?;
//! store.persist(&session, response.headers_mut()).await?;
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod constants;
pub mod cookie;
pub mod error;
pub mod lifecycle;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;
pub mod providers;
pub mod state;
pub mod stores;

// Re-export main types for convenience
pub use error::{Result, SessionError};
pub use lifecycle::{apply_visit, pick_greeting, EntropySource};
pub use state::{Session, SessionDocument, SessionId, VisitValues};
