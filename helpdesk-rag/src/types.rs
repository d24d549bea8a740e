//! Type definitions for the RAG system
//!
//! Error types for every stage of the pipeline, and the small value types
//! passed between stages.

use helpdesk_core::{ChatMessage, ChatServiceConfig, Classify, ErrorKind};
use serde::{Deserialize, Serialize};

/// Generation parameters sent with every chat completion request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.6,
        }
    }
}

impl From<&ChatServiceConfig> for GenerationParams {
    fn from(config: &ChatServiceConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Exactly one system message followed by one user message
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSequence([ChatMessage; 2]);

impl MessageSequence {
    pub fn new(system: String, user: String) -> Self {
        Self([ChatMessage::system(system), ChatMessage::user(user)])
    }

    pub fn system(&self) -> &ChatMessage {
        &self.0[0]
    }

    pub fn user(&self) -> &ChatMessage {
        &self.0[1]
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.0
    }
}

/// A row returned by the store's similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedDocument {
    pub doc_context: String,
    /// Present when the store function returns it
    #[serde(default)]
    pub similarity: Option<f32>,
}

/// Answer produced by the RAG path, with the context it was grounded on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagAnswer {
    pub answer: String,
    pub context: Vec<String>,
}

/// Stages a question passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    ReceivedQuestion,
    Embedding,
    Retrieving,
    Composing,
    Completing,
    Responded,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::ReceivedQuestion => "received_question",
            PipelineStage::Embedding => "embedding",
            PipelineStage::Retrieving => "retrieving",
            PipelineStage::Composing => "composing",
            PipelineStage::Completing => "completing",
            PipelineStage::Responded => "responded",
        };
        f.write_str(name)
    }
}

/// Failures of the embedding service client
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Hugging Face Embedding API token is not configured.")]
    MissingCredential,

    #[error("Failed to get embedding: {0}")]
    Transport(String),

    #[error("Failed to get embedding: embedding API returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Embedding API returned unexpected data format: {0}")]
    Format(String),
}

impl Classify for EmbeddingError {
    fn kind(&self) -> ErrorKind {
        match self {
            EmbeddingError::MissingCredential => ErrorKind::Configuration,
            EmbeddingError::Transport(_) => ErrorKind::UpstreamTransport,
            EmbeddingError::Service { .. } | EmbeddingError::Format(_) => {
                ErrorKind::UpstreamService
            }
        }
    }
}

/// Failures of the document store client
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document store is not configured: {0}")]
    MissingConfiguration(String),

    #[error("Document store request failed: {0}")]
    Transport(String),

    #[error("Supabase call failed ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Document store returned an unexpected response: {0}")]
    Format(String),
}

impl Classify for StoreError {
    fn kind(&self) -> ErrorKind {
        match self {
            StoreError::MissingConfiguration(_) => ErrorKind::Configuration,
            StoreError::Transport(_) => ErrorKind::UpstreamTransport,
            StoreError::Rejected { .. } | StoreError::Format(_) => ErrorKind::UpstreamService,
        }
    }
}

/// Failures of the similarity retriever
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("Failed to retrieve documents due to embedding error: {0}")]
    Embedding(String),

    #[error("Expected the query vector to be a non-empty list of finite floats, but it {0}")]
    InvalidVector(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Classify for RetrievalError {
    fn kind(&self) -> ErrorKind {
        match self {
            RetrievalError::Embedding(_) | RetrievalError::InvalidVector(_) => {
                ErrorKind::RetrievalFormat
            }
            RetrievalError::Store(e) => e.kind(),
        }
    }
}

/// Failures of the chat completion client
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Hugging Face Chat API token is not configured.")]
    MissingCredential,

    #[error("The AI model is loading. Try again later.")]
    Loading,

    #[error("An error occurred with the AI chat API request: status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("An error occurred with the AI chat API request: {0}")]
    Transport(String),

    #[error("Chat API returned an unexpected response: {0}")]
    Format(String),
}

impl Classify for ChatError {
    fn kind(&self) -> ErrorKind {
        match self {
            ChatError::MissingCredential => ErrorKind::Configuration,
            ChatError::Loading => ErrorKind::UpstreamLoading,
            ChatError::Transport(_) => ErrorKind::UpstreamTransport,
            ChatError::Service { .. } | ChatError::Format(_) => ErrorKind::UpstreamService,
        }
    }
}

/// Error types for the RAG system
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("No question provided in the request body.")]
    MissingQuestion,

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Failed to generate embedding: {0}")]
    Embedding(#[source] EmbeddingError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Chat(#[from] ChatError),
}

impl From<EmbeddingError> for RagError {
    fn from(err: EmbeddingError) -> Self {
        RagError::Embedding(err)
    }
}

impl Classify for RagError {
    fn kind(&self) -> ErrorKind {
        match self {
            RagError::MissingQuestion => ErrorKind::ClientInput,
            RagError::UnknownPersona(_) => ErrorKind::Configuration,
            RagError::Embedding(e) => e.kind(),
            RagError::Retrieval(e) => e.kind(),
            RagError::Chat(e) => e.kind(),
        }
    }
}

pub type RagResult<T> = Result<T, RagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_classification_survives_wrapping() {
        let error = RagError::from(ChatError::Loading);
        assert_eq!(error.kind(), ErrorKind::UpstreamLoading);
        assert_eq!(error.kind().status_code(), 503);
        assert!(error.to_string().contains("loading"));

        let error = RagError::from(ChatError::Service {
            status: 502,
            body: "bad gateway".to_string(),
        });
        assert_eq!(error.kind().status_code(), 500);
        assert!(error.to_string().contains("502"));
    }

    #[test]
    fn test_embedding_failure_message_names_the_stage() {
        let error = RagError::from(EmbeddingError::MissingCredential);
        assert_eq!(
            error.to_string(),
            "Failed to generate embedding: Hugging Face Embedding API token is not configured."
        );
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_store_errors_keep_their_kind_through_retrieval() {
        let error = RetrievalError::from(StoreError::Rejected {
            status: 404,
            message: "function get_similar_documents does not exist".to_string(),
        });
        assert_eq!(error.kind(), ErrorKind::UpstreamService);
        assert!(error.to_string().contains("get_similar_documents"));

        let error = RetrievalError::Embedding("token missing".to_string());
        assert_eq!(error.kind(), ErrorKind::RetrievalFormat);
    }

    #[test]
    fn test_message_sequence_is_system_then_user() {
        let messages = MessageSequence::new("persona".to_string(), "question".to_string());
        let roles: Vec<_> = messages.as_slice().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![helpdesk_core::Role::System, helpdesk_core::Role::User]
        );
        assert_eq!(messages.user().content, "question");
    }
}
