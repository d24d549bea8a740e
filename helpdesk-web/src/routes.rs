//! Route definitions for the helpdesk web server

use crate::{handlers, openapi, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Tickets
        .route("/tickets", get(handlers::get_tickets))
        // Assistant endpoints
        .route("/ai", post(handlers::ai_endpoint))
        .route("/duo", post(handlers::duo_endpoint))
        .route("/rag", post(handlers::rag_endpoint))
        // API documentation
        .route("/openapi.json", get(openapi::openapi_spec))
}
