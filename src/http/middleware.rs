//! Middleware for the Gavel API.
//!
//! One layer: request logging with latency. Server errors log at
//! ERROR, rejected requests (4xx, including invalid uploads and
//! missing blobs) at WARN, everything else at INFO.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Log every request with method, path, status and latency
pub async fn log_request(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(%method, path, status = status.as_u16(), elapsed_ms, "Request failed");
    } else if status.is_client_error() {
        tracing::warn!(%method, path, status = status.as_u16(), elapsed_ms, "Request rejected");
    } else {
        tracing::info!(%method, path, status = status.as_u16(), elapsed_ms, "Request served");
    }

    response
}
