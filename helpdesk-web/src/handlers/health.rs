//! Health check and greeting handlers

use super::types::HealthResponse;
use axum::response::{Html, Json};

pub const GREETING: &str = "<p>Hello, World! This is the data from backend. <p>";

/// Greeting page
pub async fn index() -> Html<&'static str> {
    Html(GREETING)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    summary = "Health check",
    description = "Check the server health status",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
