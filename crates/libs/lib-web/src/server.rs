//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! This module provides the main server setup function that creates the Axum router,
//! registers all routes, applies middleware, and starts the HTTP server.

// region: --- Imports
use crate::chat::{chat_websocket, ChatAppState};
use crate::handlers;
use crate::middleware::{log_requests, require_auth, stamp_req};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use lib_core::{create_pool, Config, DbPool};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
}

impl axum::extract::FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3001")
    pub bind_address: String,
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
    /// Database migrations path
    pub migrations_path: &'static str,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
            migrations_path: "./migrations",
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading fails
/// - Database connection or migrations fail
/// - Server binding fails
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    // Configure tracing subscriber
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" => tracing_subscriber::EnvFilter::new("trace"),
        "debug" => tracing_subscriber::EnvFilter::new("debug"),
        "warn" => tracing_subscriber::EnvFilter::new("warn"),
        "error" => tracing_subscriber::EnvFilter::new("error"),
        _ => tracing_subscriber::EnvFilter::new("info"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    info!("DERMACARE BACKEND STARTING");
    info!("Log level: {}", log_level);

    dotenvy::dotenv().ok();

    info!("Loading configuration...");
    lib_core::config::init_config().map_err(|e| anyhow::anyhow!(e))?;
    let app_config = lib_core::config::core_config().clone();

    info!("Database URL: {}", app_config.database_url);

    // Ensure data directory exists for SQLite database
    if let Some(db_path) = app_config.database_url.strip_prefix("sqlite:") {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("Created database directory: {:?}", parent);
            }
        }
        info!("Database file will be at: {}", db_path);
    }

    info!("Connecting to database...");
    let pool = create_pool().await?;

    info!("Running database migrations from: {}", config.migrations_path);
    let migrator =
        sqlx::migrate::Migrator::new(std::path::Path::new(config.migrations_path)).await?;
    migrator.run(&pool).await?;
    info!("Migrations complete");

    // Create chat app state
    let chat_state = Arc::new(ChatAppState::new(pool.clone(), app_config.clone()));

    let state = AppState {
        db: pool,
        config: app_config,
    };

    // Create router
    let app = create_router(state, chat_state, config.allowed_origins.clone());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    info!("SERVER READY: http://{}", config.bind_address);
    log_server_info();

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the main application router with all routes
fn create_router(
    state: AppState,
    chat_state: Arc<ChatAppState>,
    allowed_origins: Vec<String>,
) -> Router {
    use axum::http::{HeaderValue, Method};

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    info!("[ROUTE SETUP] Registering HTTP routes...");

    // Everything past the auth endpoints requires a valid bearer token.
    let protected = Router::new()
        .route(
            "/api/chats",
            post(handlers::chats::create_chat).get(handlers::chats::list_chats),
        )
        .route(
            "/api/chats/{id}/messages",
            get(handlers::chats::get_chat_messages),
        )
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/api/notifications/unread-count",
            get(handlers::notifications::unread_count),
        )
        .route(
            "/api/notifications/{id}/read",
            post(handlers::notifications::mark_read),
        )
        .route(
            "/api/notifications/read-all",
            post(handlers::notifications::mark_all_read),
        )
        .route(
            "/api/notifications/{id}",
            delete(handlers::notifications::delete_notification),
        )
        .route(
            "/api/appointments",
            post(handlers::appointments::create_appointment)
                .get(handlers::appointments::list_appointments),
        )
        .route(
            "/api/appointments/{id}/status",
            put(handlers::appointments::update_appointment_status),
        )
        .route(
            "/api/appointments/{id}",
            delete(handlers::appointments::delete_appointment),
        )
        .route(
            "/api/admin/dermatologists/pending",
            get(handlers::admin::list_pending_dermatologists),
        )
        .route(
            "/api/admin/dermatologists/{id}/approve",
            post(handlers::admin::approve_dermatologist),
        )
        .route(
            "/api/admin/dermatologists/{id}/reject",
            post(handlers::admin::reject_dermatologist),
        )
        .route_layer(axum::middleware::from_fn(require_auth));

    Router::new()
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/health", get(|| async { "OK" }))
        .merge(protected)
        .fallback(|| async {
            info!("[404 HANDLER] Unmatched route - returning 404");
            (axum::http::StatusCode::NOT_FOUND, "Route not found")
        })
        .merge(
            // The websocket route authenticates via ?token= instead of the
            // Authorization header, so it sits outside the protected router.
            Router::new()
                .route("/api/ws/chat", get(chat_websocket))
                .with_state(chat_state),
        )
        .with_state(state)
        // Request stamping (adds request ID) - must be first
        .layer(axum::middleware::from_fn(stamp_req))
        // Request/response logging
        .layer(axum::middleware::from_fn(log_requests))
        // Tower HTTP trace layer for spans
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    let request_id = request
                        .extensions()
                        .get::<crate::middleware::mw_req_stamp::RequestStamp>()
                        .map(|s| s.id.clone())
                        .unwrap_or_else(|| "unknown".to_string());
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                },
            ),
        )
        .layer(cors)
}

/// Log server information
fn log_server_info() {
    info!("AUTH:");
    info!("   • POST /api/auth/signup");
    info!("   • POST /api/auth/login");
    info!("CHAT:");
    info!("   • GET  /api/ws/chat?token={{jwt}}");
    info!("   • POST /api/chats");
    info!("   • GET  /api/chats");
    info!("   • GET  /api/chats/{{id}}/messages");
    info!("NOTIFICATIONS:");
    info!("   • GET  /api/notifications");
    info!("   • GET  /api/notifications/unread-count");
    info!("   • POST /api/notifications/{{id}}/read");
    info!("   • POST /api/notifications/read-all");
    info!("   • DELETE /api/notifications/{{id}}");
    info!("APPOINTMENTS:");
    info!("   • POST /api/appointments");
    info!("   • GET  /api/appointments");
    info!("   • PUT  /api/appointments/{{id}}/status");
    info!("   • DELETE /api/appointments/{{id}}");
    info!("ADMIN:");
    info!("   • GET  /api/admin/dermatologists/pending");
    info!("   • POST /api/admin/dermatologists/{{id}}/approve");
    info!("   • POST /api/admin/dermatologists/{{id}}/reject");
    info!("HEALTH:");
    info!("   • GET  /health");
}
// endregion: --- Server Setup
