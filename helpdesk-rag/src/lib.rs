//! Helpdesk RAG - Retrieval-Augmented Generation for IT support questions
//!
//! Clients for the hosted embedding, document store and chat services, the
//! persona catalog, and the pipeline that ties them together to answer a
//! question directly or from retrieved support documents.

pub mod embeddings;
pub mod http;
pub mod ingest;
pub mod llm_client;
pub mod prompts;
pub mod rag_pipeline;
pub mod retriever;
pub mod storage;
pub mod traits;
pub mod types;

#[cfg(test)]
mod testing;

pub use embeddings::*;
pub use http::*;
pub use ingest::*;
pub use llm_client::*;
pub use prompts::{
    persona, PersonaCatalog, PersonaTemplate, PromptAssembler, CONTEXT_PLACEHOLDER,
    DEFAULT_CONTEXT_CLAUSE,
};
pub use rag_pipeline::*;
pub use retriever::*;
pub use storage::*;
pub use traits::*;
pub use types::*;
