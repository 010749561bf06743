//! hello-views server.
//!
//! Greets each visitor in a randomly chosen language and counts how many
//! times their browser session has viewed the page.
//!
//! Run with: `PORT=8080 REDIS_URL=redis://127.0.0.1:6379 cargo run --bin hello-views`

mod config;

use anyhow::Context as _;
use config::ServerConfig;
use hello_views_session::cookie::SessionCookieCodec;
use hello_views_session::stores::{DocumentSessionStore, RedisDocumentBackend};
use hello_views_web::{app_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "hello_views=info,hello_views_web=info,hello_views_session=info,tower_http=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;

    let codec = match &config.session_key {
        Some(key) => SessionCookieCodec::new(key, config.session_max_age)
            .context("invalid session key")?,
        None => {
            warn!("SESSION_KEY not set; using a random key, sessions will not survive a restart");
            SessionCookieCodec::ephemeral(config.session_max_age)
        }
    };

    let backend = RedisDocumentBackend::new(&config.redis_url)
        .await
        .context("failed to connect to the session store")?;
    info!("Session store connected");

    let app = app_router(AppState::new(DocumentSessionStore::new(backend, codec)));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Unable to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
