//! Embedding generation
//!
//! Client for a hosted feature-extraction endpoint. The endpoint takes
//! `{"inputs": [text, ...]}` and answers with one vector per input.

use crate::http::describe_transport_error;
use crate::traits::Embedder;
use crate::types::EmbeddingError;
use async_trait::async_trait;
use helpdesk_core::EmbeddingServiceConfig;
use serde::Serialize;
use tracing::{debug, error, warn};

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
}

/// Embedding client for the hosted inference router
#[derive(Clone)]
pub struct HuggingFaceEmbedder {
    http: reqwest::Client,
    config: EmbeddingServiceConfig,
}

impl HuggingFaceEmbedder {
    pub fn new(config: EmbeddingServiceConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    async fn embed_many(&self, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let token = self
            .config
            .api_token
            .as_deref()
            .ok_or(EmbeddingError::MissingCredential)?;

        debug!(
            model = %self.config.model,
            inputs = inputs.len(),
            "Requesting embeddings"
        );

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(token)
            .json(&FeatureExtractionRequest { inputs: &inputs })
            .send()
            .await
            .map_err(|e| {
                let detail = describe_transport_error(&e);
                error!(timeout = e.is_timeout(), "Error calling embedding API: {}", detail);
                EmbeddingError::Transport(detail)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EmbeddingError::Transport(describe_transport_error(&e)))?;

        if !status.is_success() {
            error!(
                status = status.as_u16(),
                body = %body,
                "Embedding API returned an error response"
            );
            return Err(EmbeddingError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let vectors = parse_vectors(&body).ok_or_else(|| {
            warn!(
                "Unexpected format from embedding API (status {}): {}",
                status, body
            );
            EmbeddingError::Format(body.clone())
        })?;

        debug!(
            vectors = vectors.len(),
            dimension = vectors.first().map(Vec::len).unwrap_or(0),
            "Received embeddings"
        );
        Ok(vectors)
    }
}

/// A non-empty list of numeric lists, or nothing
fn parse_vectors(body: &str) -> Option<Vec<Vec<f32>>> {
    let vectors: Vec<Vec<f32>> = serde_json::from_str(body).ok()?;
    if vectors.is_empty() {
        return None;
    }
    Some(vectors)
}
