//! Gavel HTTP server entry point
//!
//! Starts the REST API server for the municipal meeting document
//! service.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gavel::core::config::Config;
use gavel::core::services::Services;
use gavel::http::{self, middleware as http_middleware};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gavel=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gavel document service");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load()?;
    config.log_config();

    // Create shared services
    let services = Arc::new(Services::new(config.clone()));

    // Build the API router
    let app = Router::new()
        // Health check endpoint
        .route("/health", get(http::health_handler))
        // API v1 endpoints
        .route("/api/v1/documents", post(http::submit_document_handler))
        .route("/api/v1/places", get(http::places_handler))
        .route("/api/v1/index/group", post(http::build_group_handler))
        .route("/api/v1/index/place", post(http::build_place_handler))
        // Wildcard: cache keys are blob paths and contain slashes
        .route("/api/v1/cache/*key", get(http::cache_read_handler))
        .route("/api/v1/cache", post(http::cache_write_handler))
        .route("/api/v1/tasks", post(http::schedule_task_handler))
        .route("/api/v1/tasks/:task_id", get(http::task_status_handler))
        // Add middleware
        .layer(middleware::from_fn(http_middleware::log_request))
        .layer(CorsLayer::permissive())
        // Add shared state
        .with_state(services);

    // Bind to address and start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Service ready - Health check at http://{}/health", addr);

    // Serve the application
    axum::serve(listener, app).await?;

    Ok(())
}
