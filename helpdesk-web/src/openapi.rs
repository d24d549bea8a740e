//! OpenAPI specification for the helpdesk web server

use axum::response::Json;
use utoipa::OpenApi;

use crate::handlers::{AnswerResponse, ErrorResponse, HealthResponse, QuestionRequest, Ticket};

/// Main OpenAPI specification for the helpdesk web server
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Helpdesk API",
        version = "0.1.0",
        description = "IT support assistant with retrieval over support documents",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Health endpoints
        crate::handlers::health_check,

        // Tickets
        crate::handlers::get_tickets,

        // Assistant endpoints
        crate::handlers::ai_endpoint,
        crate::handlers::duo_endpoint,
        crate::handlers::rag_endpoint,
    ),
    components(
        schemas(
            HealthResponse,
            Ticket,
            QuestionRequest,
            AnswerResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Tickets", description = "Support tickets"),
        (name = "Assistant", description = "IT support question answering"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
