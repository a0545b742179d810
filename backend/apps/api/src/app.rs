//! Router assembly
//!
//! `/api/auth/*`, the catalog under `/api`, `/api/health`, and optionally
//! the built SPA for every other path.

use std::sync::Arc;

use auth::presentation::AuthAppState;
use auth::{AuthConfig, PgAuthRepository, SessionStore, auth_router};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use catalog::{CatalogAppState, PgCatalogRepository, catalog_router};
use kernel::error::app_error::AppError;
use sqlx::PgPool;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Build the full application router over the given session store
pub fn build_app<S>(pool: PgPool, sessions: Arc<S>, config: &ServerConfig) -> Router
where
    S: SessionStore + Send + Sync + 'static,
{
    let auth_config: Arc<AuthConfig> = Arc::new(config.auth.clone());
    let users = Arc::new(PgAuthRepository::new(pool.clone()));
    let auth_state = AuthAppState::new(users, sessions, auth_config);
    let guard = auth_state.guard();

    let catalog_state = CatalogAppState::new(Arc::new(PgCatalogRepository::new(pool)));

    let api = Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_router(auth_state))
        .merge(catalog_router(catalog_state, guard))
        .fallback(api_not_found);

    let mut app = Router::new().nest("/api", api);

    if let Some(dir) = &config.frontend_dir {
        // Client-side routes resolve to index.html
        let spa = ServeDir::new(dir).not_found_service(ServeFile::new(dir.join("index.html")));
        app = app.fallback_service(spa);
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.frontend_origins))
}

/// GET /api/health
async fn health() -> &'static str {
    "ok"
}

async fn api_not_found() -> AppError {
    AppError::not_found("Not found")
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_credentials(true)
}
