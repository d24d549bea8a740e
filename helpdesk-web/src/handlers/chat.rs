//! Assistant handlers
//!
//! All three endpoints share one contract: `{question}` in, `{answer}` out,
//! `{error}` with 400, 500 or 503 on failure.

use super::types::{AnswerResponse, ErrorResponse, QuestionRequest};
use crate::{AppState, WebResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use helpdesk_rag::persona;
use tracing::{debug, info};

type QuestionPayload = Result<Json<QuestionRequest>, JsonRejection>;

/// The question field, treating an unreadable body as a missing question
fn question_from(payload: QuestionPayload) -> Option<String> {
    match payload {
        Ok(Json(request)) => request.question,
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection.body_text());
            None
        }
    }
}

async fn answer_with(
    state: &AppState,
    persona_name: &str,
    payload: QuestionPayload,
) -> WebResult<Json<AnswerResponse>> {
    let question = question_from(payload);
    info!("Processing {} question", persona_name);

    let answer = state
        .pipeline
        .answer(persona_name, question.as_deref())
        .await?;
    Ok(Json(AnswerResponse { answer }))
}

/// Ask the general IT support assistant
#[utoipa::path(
    post,
    path = "/api/ai",
    tag = "Assistant",
    summary = "Ask a general IT question",
    request_body = QuestionRequest,
    responses(
        (status = 200, description = "Answer generated", body = AnswerResponse),
        (status = 400, description = "No question provided", body = ErrorResponse),
        (status = 500, description = "Upstream or configuration failure", body = ErrorResponse),
        (status = 503, description = "Model is loading", body = ErrorResponse)
    )
)]
pub async fn ai_endpoint(
    State(state): State<AppState>,
    payload: QuestionPayload,
) -> WebResult<Json<AnswerResponse>> {
    answer_with(&state, persona::GENERAL, payload).await
}

/// Ask the assistant that knows the DUO bypass-code procedure
#[utoipa::path(
    post,
    path = "/api/duo",
    tag = "Assistant",
    summary = "Ask about DUO and bypass codes",
    request_body = QuestionRequest,
    responses(
        (status = 200, description = "Answer generated", body = AnswerResponse),
        (status = 400, description = "No question provided", body = ErrorResponse),
        (status = 500, description = "Upstream or configuration failure", body = ErrorResponse),
        (status = 503, description = "Model is loading", body = ErrorResponse)
    )
)]
pub async fn duo_endpoint(
    State(state): State<AppState>,
    payload: QuestionPayload,
) -> WebResult<Json<AnswerResponse>> {
    answer_with(&state, persona::DUO, payload).await
}

/// Ask a question answered from the stored support documents
#[utoipa::path(
    post,
    path = "/api/rag",
    tag = "Assistant",
    summary = "Ask using retrieved support documents",
    request_body = QuestionRequest,
    responses(
        (status = 200, description = "Answer generated", body = AnswerResponse),
        (status = 400, description = "No question provided", body = ErrorResponse),
        (status = 500, description = "Embedding, retrieval or upstream failure", body = ErrorResponse),
        (status = 503, description = "Model is loading", body = ErrorResponse)
    )
)]
pub async fn rag_endpoint(
    State(state): State<AppState>,
    payload: QuestionPayload,
) -> WebResult<Json<AnswerResponse>> {
    let question = question_from(payload);

    let result = state.pipeline.ask(question.as_deref()).await?;
    info!("RAG answer grounded on {} passages", result.context.len());

    Ok(Json(AnswerResponse {
        answer: result.answer,
    }))
}
