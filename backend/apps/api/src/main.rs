//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod app;
mod cleanup;
mod config;

use std::sync::Arc;

use auth::{MemorySessionStore, PgAuthRepository, SessionStore};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ServerConfig, SessionBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "library_api=info,auth=info,catalog=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!(max_connections = config.max_connections, "Connected to database");

    match config.session_backend {
        SessionBackend::Memory => {
            tracing::info!("Using in-memory session store");
            serve(config, pool, Arc::new(MemorySessionStore::new())).await
        }
        SessionBackend::Postgres => {
            tracing::info!("Using PostgreSQL session store");
            let sessions = Arc::new(PgAuthRepository::new(pool.clone()));
            serve(config, pool, sessions).await
        }
    }
}

async fn serve<S>(config: ServerConfig, pool: PgPool, sessions: Arc<S>) -> anyhow::Result<()>
where
    S: SessionStore + Send + Sync + 'static,
{
    // Startup cleanup runs on the first tick; errors never block startup
    tokio::spawn(cleanup::run_cleanup_loop(
        sessions.clone(),
        config.session_cleanup_interval,
    ));

    let app = app::build_app(pool, sessions, &config);

    if let Some(dir) = &config.frontend_dir {
        tracing::info!(dir = %dir.display(), "Serving frontend");
    }

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
