//! The greeting page.
//!
//! One request runs through a fixed sequence of phases:
//!
//! ```text
//! Resolving ─▶ Mutating ─▶ Persisting ─▶ Rendering ─▶ Done
//!     └───────────┴────────────┴─────────────┴──────▶ Failed
//! ```
//!
//! Any failure aborts the remaining phases. The session is persisted
//! before rendering, so a rendering bug never loses a view.

use crate::error::AppError;
use crate::render::{render_visit, RenderError};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use hello_views_session::providers::SessionStore;
use hello_views_session::{apply_visit, SessionError};
use std::fmt;
use thiserror::Error;

/// Lifecycle phase of a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Looking up or creating the session.
    Resolving,
    /// Applying the view increment.
    Mutating,
    /// Writing the session back and setting the cookie.
    Persisting,
    /// Producing the HTML fragment.
    Rendering,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Resolving => "resolving",
            Self::Mutating => "mutating",
            Self::Persisting => "persisting",
            Self::Rendering => "rendering",
        })
    }
}

/// Why a page request failed.
#[derive(Debug, Error)]
pub enum VisitError {
    /// Session resolution, mutation or persistence failed.
    #[error("{phase} session failed: {source}")]
    Session {
        /// Phase that failed.
        phase: Phase,
        /// Underlying session error.
        #[source]
        source: SessionError,
    },

    /// The session was persisted but could not be rendered.
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
}

impl VisitError {
    fn session(phase: Phase) -> impl FnOnce(SessionError) -> Self {
        move |source| Self::Session { phase, source }
    }

    /// Phase the request failed in.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Session { phase, .. } => *phase,
            Self::Render(_) => Phase::Rendering,
        }
    }

    /// Metrics label for the outcome.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Session { source, .. } => source.kind(),
            Self::Render(_) => "render_failed",
        }
    }
}

impl From<VisitError> for AppError {
    fn from(err: VisitError) -> Self {
        match err {
            VisitError::Session { source, .. } => source.into(),
            VisitError::Render(source) => source.into(),
        }
    }
}

/// Greet the visitor and count the view.
///
/// # Endpoint
///
/// ```text
/// GET /
/// ```
///
/// # Response
///
/// ```text
/// 200 OK
/// Content-Type: text/html; charset=utf-8
/// Set-Cookie: hello-views=...; Path=/; Max-Age=2592000; HttpOnly; SameSite=Lax
///
/// <body>2 views for "Ciao Mondo"</body>
/// ```
pub async fn index<S>(State(state): State<AppState<S>>, headers: HeaderMap) -> Response
where
    S: SessionStore + 'static,
{
    let mut response_headers = HeaderMap::new();

    match visit(&state, &headers, &mut response_headers).await {
        Ok(body) => {
            metrics::counter!("hello_views.visits", "outcome" => "ok").increment(1);
            (StatusCode::OK, response_headers, Html(body)).into_response()
        }
        Err(err) => {
            metrics::counter!("hello_views.visits", "outcome" => err.outcome()).increment(1);
            tracing::error!(phase = %err.phase(), error = %err, "Visit failed");
            // Only a rendering failure carries a cookie: the view was persisted.
            (response_headers, AppError::from(err)).into_response()
        }
    }
}

async fn visit<S: SessionStore>(
    state: &AppState<S>,
    request_headers: &HeaderMap,
    response_headers: &mut HeaderMap,
) -> Result<String, VisitError> {
    let session = state
        .sessions
        .resolve(request_headers)
        .await
        .map_err(VisitError::session(Phase::Resolving))?;
    let created = session.is_new;

    let session = state
        .entropy
        .with_rng(|rng| apply_visit(session, rng))
        .map_err(VisitError::session(Phase::Mutating))?;

    state
        .sessions
        .persist(&session, response_headers)
        .await
        .map_err(VisitError::session(Phase::Persisting))?;

    if created {
        metrics::counter!("hello_views.sessions_created").increment(1);
        tracing::info!(
            session_id = %session.id,
            greeting = %session.values.greeting,
            "Created session"
        );
    }

    Ok(render_visit(&session.values)?)
}
