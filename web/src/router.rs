//! Router composition.

use crate::handlers::{health_check, index};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{routing::get, Router};
use hello_views_session::providers::SessionStore;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Create the application router.
///
/// # Routes
///
/// - `GET /` - greeting page with the session view count
/// - `GET /health` - liveness check
///
/// # Layers (outermost first)
///
/// 1. Correlation id span
/// 2. Request/response tracing
/// 3. Panic recovery (500 instead of a dropped connection)
pub fn app_router<S>(state: AppState<S>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/", get(index::<S>))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}
