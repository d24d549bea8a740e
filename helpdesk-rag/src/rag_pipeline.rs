//! RAG Pipeline - question answering over the hosted services
//!
//! Two paths share one pipeline. The direct path sends a persona and the
//! question straight to the chat model. The retrieval-augmented path embeds
//! the question, fetches similar passages from the document store and puts
//! them into the persona before asking the model.

use crate::embeddings::HuggingFaceEmbedder;
use crate::llm_client::ChatCompletionClient;
use crate::prompts::{persona, PersonaCatalog, PromptAssembler};
use crate::retriever::SimilarityRetriever;
use crate::storage::SupabaseStore;
use crate::traits::{ChatModel, DocumentStore, Embedder};
use crate::types::{GenerationParams, PipelineStage, RagAnswer, RagError, RagResult};
use helpdesk_core::{log_operation_error, log_operation_start, log_operation_success, AppConfig};

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The trimmed question, or [`RagError::MissingQuestion`] when it is absent
/// or blank
pub fn validate_question(question: Option<&str>) -> RagResult<&str> {
    match question.map(str::trim) {
        Some(q) if !q.is_empty() => Ok(q),
        _ => Err(RagError::MissingQuestion),
    }
}

/// Question answering pipeline
pub struct RagPipeline {
    embedder: Arc<dyn Embedder>,
    retriever: SimilarityRetriever,
    chat: Arc<dyn ChatModel>,
    personas: PersonaCatalog,
    params: GenerationParams,
}

impl RagPipeline {
    /// Pipeline over the given upstreams with the built-in personas
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn DocumentStore>,
        chat: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            embedder,
            retriever: SimilarityRetriever::new(store),
            chat,
            personas: PersonaCatalog::builtin(),
            params: GenerationParams::default(),
        }
    }

    /// Pipeline over the hosted services described by `config`.
    ///
    /// Missing credentials are not an error here; each client reports them
    /// on first use.
    pub fn from_config(config: &AppConfig, http: reqwest::Client) -> Self {
        let embedder = HuggingFaceEmbedder::new(config.embedding.clone(), http.clone());
        let store = SupabaseStore::new(config.store.clone(), http.clone());
        let chat = ChatCompletionClient::new(config.chat.clone(), http);

        Self::new(Arc::new(embedder), Arc::new(store), Arc::new(chat))
            .with_generation_params(GenerationParams::from(&config.chat))
    }

    pub fn with_personas(mut self, personas: PersonaCatalog) -> Self {
        self.personas = personas;
        self
    }

    pub fn with_generation_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn personas(&self) -> &PersonaCatalog {
        &self.personas
    }

    /// Answer `question` in the voice of `persona_name`, without retrieval
    pub async fn answer(&self, persona_name: &str, question: Option<&str>) -> RagResult<String> {
        let question = validate_question(question)?;
        let persona = self
            .personas
            .get(persona_name)
            .ok_or_else(|| RagError::UnknownPersona(persona_name.to_string()))?;

        log_operation_start!("answer", persona = persona_name);
        let start_time = Instant::now();

        let messages = PromptAssembler::build(persona, question, None);
        let answer = self
            .chat
            .complete(messages.as_slice(), self.params)
            .await
            .map_err(|e| {
                log_operation_error!("answer", e, persona = persona_name);
                RagError::from(e)
            })?;

        log_operation_success!(
            "answer",
            persona = persona_name,
            duration_ms = start_time.elapsed().as_millis() as u64
        );
        Ok(answer)
    }

    /// Answer `question` from documents similar to it
    pub async fn ask(&self, question: Option<&str>) -> RagResult<RagAnswer> {
        let question = validate_question(question)?;
        let persona = self
            .personas
            .get(persona::RAG)
            .ok_or_else(|| RagError::UnknownPersona(persona::RAG.to_string()))?;

        log_operation_start!("rag_ask");
        let start_time = Instant::now();
        debug!(stage = %PipelineStage::ReceivedQuestion, "Processing query: {}", question);

        debug!(stage = %PipelineStage::Embedding, "Embedding question");
        let vector = self.embedder.embed(question.into()).await.map_err(|e| {
            log_operation_error!("rag_ask", e, stage = %PipelineStage::Embedding);
            RagError::from(e)
        })?;

        debug!(stage = %PipelineStage::Retrieving, dimension = vector.len(), "Retrieving documents");
        let context = self.retriever.retrieve(&vector).await.map_err(|e| {
            log_operation_error!("rag_ask", e, stage = %PipelineStage::Retrieving);
            RagError::from(e)
        })?;

        if context.is_empty() {
            warn!("No relevant documents found for query");
        }
        info!("🔍 Retrieved {} relevant passages", context.len());

        debug!(stage = %PipelineStage::Composing, "Building prompt");
        let messages = PromptAssembler::build(persona, question, Some(context.as_slice()));

        debug!(stage = %PipelineStage::Completing, "Requesting completion");
        let answer = self
            .chat
            .complete(messages.as_slice(), self.params)
            .await
            .map_err(|e| {
                log_operation_error!("rag_ask", e, stage = %PipelineStage::Completing);
                RagError::from(e)
            })?;

        debug!(stage = %PipelineStage::Responded, "Answer ready");
        log_operation_success!(
            "rag_ask",
            passages = context.len(),
            duration_ms = start_time.elapsed().as_millis() as u64
        );

        Ok(RagAnswer { answer, context })
    }
}
