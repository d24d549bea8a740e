//! Request and response types used by the handlers

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// A support ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ticket {
    #[schema(example = 1)]
    pub id: u32,
    #[schema(example = "printer not working")]
    pub issue: String,
    #[schema(example = "Open")]
    pub status: String,
}

/// Question sent to any of the assistant endpoints
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct QuestionRequest {
    #[schema(example = "My printer is not working")]
    pub question: Option<String>,
}

/// Assistant answer
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnswerResponse {
    pub answer: String,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "No question provided in the request body.")]
    pub error: String,
}
