//! Axum request handling for hello-views.
//!
//! Keeps HTTP concerns (headers, status codes, HTML) in an imperative
//! shell around the session crate's pure visit lifecycle.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at the `GET /` handler
//! 2. **Resolve** the session from the request cookie
//! 3. **Apply** the visit (pure, no I/O)
//! 4. **Persist** the session and set the cookie
//! 5. **Render** the greeting fragment
//! 6. **Map result** to an HTTP response
//!
//! # Example
//!
//! ```ignore
//! use hello_views_web::{app_router, AppState};
//!
//! let app = app_router(AppState::new(session_store));
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use middleware::{correlation_id_layer, CorrelationId, CORRELATION_ID_HEADER};
pub use router::app_router;
pub use state::AppState;
