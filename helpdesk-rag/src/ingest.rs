//! Document ingestion
//!
//! Loads a support document, embeds its full text and stores the text with
//! its vector as a single row. Documents are not chunked.

use crate::traits::{DocumentStore, Embedder};
use crate::types::{EmbeddingError, StoreError};
use helpdesk_core::{log_operation_start, log_operation_success, Classify, DocumentRecord, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Failures while ingesting one document
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Failed to extract text from {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    #[error("Document {0} has no extractable text")]
    EmptyDocument(String),

    #[error("Failed to generate embedding: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Failed to store document: {0}")]
    Store(#[from] StoreError),
}

impl Classify for IngestError {
    fn kind(&self) -> ErrorKind {
        match self {
            IngestError::Extraction { .. } | IngestError::EmptyDocument(_) => {
                ErrorKind::ClientInput
            }
            IngestError::Embedding(e) => e.kind(),
            IngestError::Store(e) => e.kind(),
        }
    }
}

/// Summary of one stored document
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedDocument {
    pub source: String,
    pub characters: usize,
    pub dimension: usize,
}

/// Embeds documents and writes them to the store
pub struct IngestionPipeline {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn DocumentStore>,
}

impl IngestionPipeline {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn DocumentStore>) -> Self {
        Self { embedder, store }
    }

    /// Embed `text` and store it; `source` only labels logs and errors
    pub async fn ingest_text(
        &self,
        source: &str,
        text: String,
    ) -> Result<IngestedDocument, IngestError> {
        if text.trim().is_empty() {
            return Err(IngestError::EmptyDocument(source.to_string()));
        }

        log_operation_start!("ingest", source = source);
        let embedding = self.embedder.embed(text.clone().into()).await?;
        debug!(source, dimension = embedding.len(), "Embedded document");

        let record = DocumentRecord {
            context: text,
            embedding,
        };
        self.store.insert_document(&record).await?;

        let ingested = IngestedDocument {
            source: source.to_string(),
            characters: record.context.chars().count(),
            dimension: record.embedding.len(),
        };
        log_operation_success!(
            "ingest",
            source = source,
            characters = ingested.characters
        );
        Ok(ingested)
    }

    /// Extract the text of a PDF and ingest it
    pub async fn ingest_pdf(&self, path: &Path) -> Result<IngestedDocument, IngestError> {
        let text = extract_pdf_text(path).await?;
        info!("📄 Extracted {} characters from {}", text.len(), path.display());
        self.ingest_text(&path.display().to_string(), text).await
    }
}

async fn extract_pdf_text(path: &Path) -> Result<String, IngestError> {
    let owned = path.to_path_buf();
    let extraction_error = |message: String| IngestError::Extraction {
        path: path.to_path_buf(),
        message,
    };

    tokio::task::spawn_blocking(move || {
        let bytes = std::fs::read(&owned).map_err(|e| e.to_string())?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| extraction_error(e.to_string()))?
    .map_err(extraction_error)
}
