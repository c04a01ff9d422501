//! Chatseed HTTP Server
//!
//! Exposes a seed run as an HTTP endpoint so it can be triggered remotely.
//!
//! # Configuration
//!
//! Environment variables:
//! - `CHATSEED_PORT`: Port to listen on (default: 8080)
//! - `CHATSEED_CONFIG`: Path to config file (default: ~/.config/chatseed/config.yaml)
//! - `CHATSEED_API_KEY`: If set, `POST /seed` requires `Authorization: Bearer <key>`
//! - `CHATSEED_SOURCE_DB` / `CHATSEED_DESTINATION_DB`: Override database paths
//!
//! # Endpoints
//!
//! - `GET /health`: Health check endpoint (no auth required)
//! - `POST /seed`: Runs a seed; 200 with the report or 500 with `{"error": ...}`

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chatseed::config::Config;
use chatseed::handler::handle;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// Configuration
// ============================================================================

/// Server settings
#[derive(Debug, Clone)]
struct ServerSettings {
    /// Port to listen on
    port: u16,
    /// Path to config file
    config_path: Option<PathBuf>,
    /// Bearer key required by `POST /seed`
    api_key: Option<String>,
}

impl ServerSettings {
    /// Load settings from environment variables
    fn from_env() -> Self {
        let port = std::env::var("CHATSEED_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let config_path = std::env::var("CHATSEED_CONFIG").ok().map(PathBuf::from);

        let api_key = std::env::var("CHATSEED_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        Self {
            port,
            config_path,
            api_key,
        }
    }
}

// ============================================================================
// State
// ============================================================================

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    api_key: Option<Arc<str>>,
    /// Keeps seed runs strictly sequential; the destination has one writer.
    seed_lock: Arc<Mutex<()>>,
}

impl AppState {
    fn new(config: Config, api_key: Option<String>) -> Self {
        Self {
            config: Arc::new(config),
            api_key: api_key.map(Arc::from),
            seed_lock: Arc::new(Mutex::new(())),
        }
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// Auth error response
#[derive(Serialize)]
struct AuthError {
    error: &'static str,
    message: &'static str,
}

fn unauthorized(error: &'static str, message: &'static str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(AuthError { error, message })).into_response()
}

/// Authentication middleware
async fn auth_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(expected) = state.api_key.as_deref() else {
        return next.run(request).await;
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match auth_header {
        Some(h) if h.starts_with("Bearer ") => {
            if &h[7..] == expected {
                next.run(request).await
            } else {
                unauthorized("invalid_key", "Invalid API key")
            }
        }
        Some(_) => unauthorized(
            "invalid_auth",
            "Authorization header must use Bearer scheme",
        ),
        None => unauthorized("missing_auth", "Authorization header required"),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint (no auth required)
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run a seed and return its report
async fn seed(State(state): State<AppState>) -> Response {
    let _guard = state.seed_lock.lock().await;

    let response = handle(&state.config).await;
    if !response.is_success() {
        tracing::error!("Seed request failed: {}", response.body);
    }

    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body,
    )
        .into_response()
}

fn router(state: AppState) -> Router {
    // Public routes (no auth)
    let public_routes = Router::new().route("/health", get(health));

    // Protected routes (auth required when an API key is configured)
    let protected_routes = Router::new()
        .route("/seed", post(seed))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatseed=info,chatseed_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = ServerSettings::from_env();

    let config = match Config::load(settings.config_path.clone()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Source database: {}", config.source_database_path.display());
    tracing::info!(
        "Destination database: {}",
        config.destination_database_path.display()
    );
    if settings.api_key.is_none() {
        tracing::warn!("CHATSEED_API_KEY not set - /seed accepts unauthenticated requests");
    }

    let app = router(AppState::new(config, settings.api_key));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
