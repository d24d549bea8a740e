//! Seams between the pipeline and the upstream services

use crate::types::{ChatError, EmbeddingError, GenerationParams, MatchedDocument, StoreError};
use async_trait::async_trait;
use helpdesk_core::{ChatMessage, DocumentRecord};

/// Input to an embedding call: one text, or several
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbeddingInput {
    /// The sequence sent upstream; a single text becomes a one-element list
    pub fn into_inputs(self) -> Vec<String> {
        match self {
            EmbeddingInput::Single(text) => vec![text],
            EmbeddingInput::Batch(texts) => texts,
        }
    }
}

impl From<&str> for EmbeddingInput {
    fn from(text: &str) -> Self {
        EmbeddingInput::Single(text.to_string())
    }
}

impl From<String> for EmbeddingInput {
    fn from(text: String) -> Self {
        EmbeddingInput::Single(text)
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(texts: Vec<String>) -> Self {
        EmbeddingInput::Batch(texts)
    }
}

/// Turns text into vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input, in input order
    async fn embed_many(&self, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// The first vector for `input`
    async fn embed(&self, input: EmbeddingInput) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_many(input.into_inputs())
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Format("no vectors in response".to_string()))
    }
}

/// Similarity search and insertion against the document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Rows most similar to `query_embedding`, most similar first
    async fn match_documents(
        &self,
        query_embedding: &[f32],
    ) -> Result<Vec<MatchedDocument>, StoreError>;

    async fn insert_document(&self, record: &DocumentRecord) -> Result<(), StoreError>;
}

/// A hosted chat model
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: GenerationParams,
    ) -> Result<String, ChatError>;
}
