//! Core data type definitions

use serde::{Deserialize, Serialize};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single role-tagged message sent to the chat completion service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A persisted document: its original text and the embedding of that text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub context: String,
    pub embedding: Vec<f32>,
}

/// Configuration for the whole backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub embedding: EmbeddingServiceConfig,
    pub chat: ChatServiceConfig,
    pub store: DocumentStoreConfig,
    /// Timeout applied to every upstream call, in seconds
    pub upstream_timeout_secs: u64,
}

/// Feature-extraction endpoint used to embed text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingServiceConfig {
    pub api_url: String,
    pub model: String,
    /// Bearer token; checked when the embedding client is first used
    pub api_token: Option<String>,
}

/// OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatServiceConfig {
    pub api_url: String,
    pub model: String,
    /// Bearer token; checked when the chat client is first used
    pub api_token: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// PostgREST endpoint of the document store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStoreConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: Option<String>,
    pub api_key: Option<String>,
    /// Name of the similarity search function exposed over RPC
    pub match_function: String,
    /// Table that ingested documents are inserted into
    pub table: String,
}
