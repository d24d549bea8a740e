//! Document retrieval
//!
//! Looks up the stored passages closest to a query vector. Top-K and the
//! distance metric are decided by the store's similarity function.

use crate::traits::DocumentStore;
use crate::types::{EmbeddingError, RetrievalError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Retrieves the context passages for a query vector
#[derive(Clone)]
pub struct SimilarityRetriever {
    store: Arc<dyn DocumentStore>,
}

impl SimilarityRetriever {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Retrieve using the outcome of an embedding call.
    ///
    /// A failed embedding becomes [`RetrievalError::Embedding`] before the
    /// vector itself is looked at.
    pub async fn retrieve_embedding(
        &self,
        embedding: Result<Vec<f32>, EmbeddingError>,
    ) -> Result<Vec<String>, RetrievalError> {
        let vector = embedding.map_err(|e| {
            warn!("Error passed from embedding to retrieval: {}", e);
            RetrievalError::Embedding(e.to_string())
        })?;
        self.retrieve(&vector).await
    }

    /// Contexts of the matching documents, most similar first. May be empty.
    pub async fn retrieve(&self, vector: &[f32]) -> Result<Vec<String>, RetrievalError> {
        check_query_vector(vector)?;

        let start_time = Instant::now();
        let rows = self.store.match_documents(vector).await?;

        info!(
            "Retrieved {} documents in {:?}",
            rows.len(),
            start_time.elapsed()
        );

        Ok(rows.into_iter().map(|row| row.doc_context).collect())
    }
}

fn check_query_vector(vector: &[f32]) -> Result<(), RetrievalError> {
    if vector.is_empty() {
        return Err(RetrievalError::InvalidVector("was empty".to_string()));
    }

    if let Some((index, value)) = vector.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(RetrievalError::InvalidVector(format!(
            "contained {} at index {}",
            value, index
        )));
    }

    debug!(dimension = vector.len(), "Query vector accepted");
    Ok(())
}
