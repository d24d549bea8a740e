//! Document store backed by Supabase (PostgREST)
//!
//! Similarity search goes through a SQL function exposed over RPC; ingested
//! documents are plain row inserts.

use crate::http::describe_transport_error;
use crate::traits::DocumentStore;
use crate::types::{MatchedDocument, StoreError};
use async_trait::async_trait;
use helpdesk_core::{DocumentRecord, DocumentStoreConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

#[derive(Serialize)]
struct MatchRequest<'a> {
    query_embedding: &'a [f32],
}

/// Error body returned by PostgREST
#[derive(Deserialize)]
struct PostgrestError {
    message: String,
}

/// Supabase client for the `documents` table and its similarity function
#[derive(Clone)]
pub struct SupabaseStore {
    http: reqwest::Client,
    config: DocumentStoreConfig,
}

impl SupabaseStore {
    pub fn new(config: DocumentStoreConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    /// Same store authenticated with a different key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    fn api_key(&self) -> Result<&str, StoreError> {
        self.config.api_key.as_deref().ok_or_else(|| {
            StoreError::MissingConfiguration("Supabase API key is not set".to_string())
        })
    }

    /// `{url}/rest/v1/{path}`
    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        let base = self.config.url.as_deref().ok_or_else(|| {
            StoreError::MissingConfiguration("Supabase URL is not set".to_string())
        })?;

        let base = if base.ends_with('/') {
            Url::parse(base)
        } else {
            Url::parse(&format!("{}/", base))
        }
        .map_err(|e| StoreError::MissingConfiguration(format!("invalid Supabase URL: {}", e)))?;

        base.join(&format!("rest/v1/{}", path))
            .map_err(|e| StoreError::MissingConfiguration(format!("invalid store path: {}", e)))
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        prefer: Option<&str>,
    ) -> Result<String, StoreError> {
        let api_key = self.api_key()?;
        let url = self.endpoint(path)?;

        let mut request = self
            .http
            .post(url)
            .header("apikey", api_key)
            .bearer_auth(api_key)
            .json(body);
        if let Some(prefer) = prefer {
            request = request.header("Prefer", prefer);
        }

        let response = request.send().await.map_err(|e| {
            let detail = describe_transport_error(&e);
            error!(
                timeout = e.is_timeout(),
                "Error during Supabase call to {}: {}",
                path,
                detail
            );
            StoreError::Transport(detail)
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(describe_transport_error(&e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<PostgrestError>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| {
                    if body.trim().is_empty() {
                        "Unknown error".to_string()
                    } else {
                        body.clone()
                    }
                });
            error!(
                path,
                status = status.as_u16(),
                body = %body,
                "Supabase returned an error response"
            );
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl DocumentStore for SupabaseStore {
    async fn match_documents(
        &self,
        query_embedding: &[f32],
    ) -> Result<Vec<MatchedDocument>, StoreError> {
        let path = format!("rpc/{}", self.config.match_function);
        let body = self
            .post(&path, &MatchRequest { query_embedding }, None)
            .await?;

        let rows: Vec<MatchedDocument> = serde_json::from_str(&body).map_err(|e| {
            error!("Unexpected similarity search response: {}", body);
            StoreError::Format(e.to_string())
        })?;

        debug!(matches = rows.len(), "Similarity search completed");
        Ok(rows)
    }

    async fn insert_document(&self, record: &DocumentRecord) -> Result<(), StoreError> {
        let table = self.config.table.clone();
        self.post(&table, record, Some("return=minimal")).await?;

        debug!(
            table = %table,
            context_chars = record.context.len(),
            dimension = record.embedding.len(),
            "Inserted document"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_core::{Classify, ErrorKind};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> SupabaseStore {
        SupabaseStore::new(
            DocumentStoreConfig {
                url: Some(server.uri()),
                api_key: Some("anon-key".to_string()),
                ..DocumentStoreConfig::default()
            },
            reqwest::Client::new(),
        )
    }

    #[tokio::test]
    async fn test_match_documents_calls_rpc_with_query_embedding() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_similar_documents"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .and(body_json(serde_json::json!({"query_embedding": [0.5, 0.25]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"doc_context": "Restart the printer.", "similarity": 0.91},
                {"doc_context": "Check the cable."}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let rows = store(&server).match_documents(&[0.5, 0.25]).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].doc_context, "Restart the printer.");
        assert_eq!(rows[0].similarity, Some(0.91));
        assert_eq!(rows[1].similarity, None);
    }

    #[tokio::test]
    async fn test_store_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "code": "PGRST202",
                "message": "Could not find the function public.get_similar_documents"
            })))
            .mount(&server)
            .await;

        let error = store(&server).match_documents(&[0.5]).await.unwrap_err();
        match &error {
            StoreError::Rejected { status, message } => {
                assert_eq!(*status, 404);
                assert!(message.contains("get_similar_documents"));
            }
            other => panic!("Expected rejected error, got {:?}", other),
        }
        assert_eq!(error.kind(), ErrorKind::UpstreamService);
    }

    #[tokio::test]
    async fn test_non_array_success_is_a_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let error = store(&server).match_documents(&[0.5]).await.unwrap_err();
        assert!(matches!(error, StoreError::Format(_)));
    }

    #[tokio::test]
    async fn test_insert_document_posts_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/documents"))
            .and(header("prefer", "return=minimal"))
            .and(body_json(serde_json::json!({
                "context": "Bypass code steps",
                "embedding": [0.5, 0.25]
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let record = DocumentRecord {
            context: "Bypass code steps".to_string(),
            embedding: vec![0.5, 0.25],
        };
        store(&server).insert_document(&record).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_url_is_a_configuration_error() {
        let store = SupabaseStore::new(
            DocumentStoreConfig {
                api_key: Some("anon-key".to_string()),
                ..DocumentStoreConfig::default()
            },
            reqwest::Client::new(),
        );

        let error = store.match_documents(&[0.5]).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
        assert!(error.to_string().contains("Supabase URL"));
    }

    #[test]
    fn test_endpoint_keeps_project_path() {
        let store = SupabaseStore::new(
            DocumentStoreConfig {
                url: Some("http://localhost:54321".to_string()),
                ..DocumentStoreConfig::default()
            },
            reqwest::Client::new(),
        );
        assert_eq!(
            store.endpoint("rpc/get_similar_documents").unwrap().as_str(),
            "http://localhost:54321/rest/v1/rpc/get_similar_documents"
        );
    }
}
