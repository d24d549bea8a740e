//! In-memory doubles for the upstream seams, used by unit tests

use crate::traits::{ChatModel, DocumentStore, Embedder};
use crate::types::{ChatError, EmbeddingError, GenerationParams, MatchedDocument, StoreError};
use async_trait::async_trait;
use helpdesk_core::{ChatMessage, DocumentRecord};
use std::sync::Mutex;

/// Returns a fixed vector, or a fixed failure
pub struct FakeEmbedder {
    vector: Vec<f32>,
    fail_with: Option<fn() -> EmbeddingError>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeEmbedder {
    pub fn returning(vector: Vec<f32>) -> Self {
        Self {
            vector,
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: fn() -> EmbeddingError) -> Self {
        Self {
            vector: Vec::new(),
            fail_with: Some(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed_many(&self, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let count = inputs.len();
        self.calls.lock().unwrap().push(inputs);
        match self.fail_with {
            Some(error) => Err(error()),
            None => Ok(vec![self.vector.clone(); count]),
        }
    }
}

/// Returns fixed contexts and records queries and inserts
pub struct FakeStore {
    contexts: Vec<String>,
    failure: Option<String>,
    queries: Mutex<Vec<Vec<f32>>>,
    inserted: Mutex<Vec<DocumentRecord>>,
}

impl FakeStore {
    pub fn with_contexts(contexts: &[&str]) -> Self {
        Self {
            contexts: contexts.iter().map(|c| c.to_string()).collect(),
            failure: None,
            queries: Mutex::new(Vec::new()),
            inserted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::with_contexts(&[])
        }
    }

    pub fn queries(&self) -> Vec<Vec<f32>> {
        self.queries.lock().unwrap().clone()
    }

    pub fn inserted(&self) -> Vec<DocumentRecord> {
        self.inserted.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError::Rejected {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn match_documents(
        &self,
        query_embedding: &[f32],
    ) -> Result<Vec<MatchedDocument>, StoreError> {
        self.queries.lock().unwrap().push(query_embedding.to_vec());
        self.check()?;
        Ok(self
            .contexts
            .iter()
            .map(|context| MatchedDocument {
                doc_context: context.clone(),
                similarity: None,
            })
            .collect())
    }

    async fn insert_document(&self, record: &DocumentRecord) -> Result<(), StoreError> {
        self.check()?;
        self.inserted.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Answers with every message content joined by newlines, or fails
pub struct FakeChat {
    fail_with: Option<fn() -> ChatError>,
    calls: Mutex<Vec<(Vec<ChatMessage>, GenerationParams)>>,
}

impl FakeChat {
    pub fn echoing() -> Self {
        Self {
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: fn() -> ChatError) -> Self {
        Self {
            fail_with: Some(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<ChatMessage>, GenerationParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: GenerationParams,
    ) -> Result<String, ChatError> {
        self.calls.lock().unwrap().push((messages.to_vec(), params));
        match self.fail_with {
            Some(error) => Err(error()),
            None => Ok(messages
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }
}
