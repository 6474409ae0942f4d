//! # Server Module
//!
//! HTTP server setup and route configuration for the auth service.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::jwt::JwtService;
use crate::auth::password::Argon2Hasher;
use crate::config::Config;
use crate::database::{DatabaseConfig, DatabaseConnection, InMemoryUserStore};
use crate::routes::auth::create_auth_routes;
use crate::routes::health::ping;
use crate::services::{AuthService, Authenticator};

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
}

/// Assemble the authenticator from configuration, choosing PostgreSQL or
/// in-memory storage.
async fn build_auth_service(config: &Config) -> Result<Arc<dyn AuthService>> {
    let jwt_service = Arc::new(JwtService::with_system_clock(&config.secrets));
    let passwords = Arc::new(Argon2Hasher::new());

    let service = match &config.database {
        Some(settings) => {
            let db_config = DatabaseConfig::from_url(&settings.url, settings.max_connections)?;
            let db = DatabaseConnection::new(db_config)
                .await
                .context("Failed to connect to DB")?;
            db.migrate().await?;
            Authenticator::new(Arc::new(db), passwords, jwt_service)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
            Authenticator::new(Arc::new(InMemoryUserStore::new()), passwords, jwt_service)
        }
    };

    Ok(Arc::new(service))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]))
}

/// Build the router with all routes and layers.
pub fn build_router(app_state: AppState, allowed_origins: &[String]) -> Result<Router> {
    let mut app = Router::new()
        .route("/ping", get(ping))
        .merge(create_auth_routes())
        .layer(TraceLayer::new_for_http());

    if !allowed_origins.is_empty() {
        app = app.layer(cors_layer(allowed_origins)?);
    }

    Ok(app.with_state(app_state))
}

/// Starts the HTTP server and serves until Ctrl-C.
pub async fn start(config: Config) -> Result<()> {
    let app_state = AppState {
        auth_service: build_auth_service(&config).await?,
    };
    let app = build_router(app_state, &config.server.allowed_origins)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr} - port may already be in use"))?;

    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Health check available at http://{}/ping", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
