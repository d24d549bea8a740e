//! Chat completion client
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint on the hosted
//! inference router. A 503 from the router means the model is still loading
//! and is reported separately so callers can ask the user to retry.

use crate::http::describe_transport_error;
use crate::traits::ChatModel;
use crate::types::{ChatError, GenerationParams};
use async_trait::async_trait;
use helpdesk_core::{ChatMessage, ChatServiceConfig};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, info, warn};

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat model reached over HTTP
#[derive(Clone)]
pub struct ChatCompletionClient {
    http: reqwest::Client,
    config: ChatServiceConfig,
}

impl ChatCompletionClient {
    pub fn new(config: ChatServiceConfig, http: reqwest::Client) -> Self {
        info!(
            "Created chat client for model: {} at {}",
            config.model, config.api_url
        );
        Self { http, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl ChatModel for ChatCompletionClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: GenerationParams,
    ) -> Result<String, ChatError> {
        let token = self
            .config
            .api_token
            .as_deref()
            .ok_or(ChatError::MissingCredential)?;

        let start_time = Instant::now();
        debug!(
            model = %self.model(),
            messages = messages.len(),
            max_tokens = params.max_tokens,
            temperature = params.temperature,
            "Requesting chat completion"
        );

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let detail = describe_transport_error(&e);
                error!(
                    model = %self.model(),
                    timeout = e.is_timeout(),
                    "Request to chat API failed: {}",
                    detail
                );
                ChatError::Transport(detail)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Transport(describe_transport_error(&e)))?;

        if status == StatusCode::SERVICE_UNAVAILABLE {
            warn!(body = %body, "Chat model is still loading");
            return Err(ChatError::Loading);
        }

        if !status.is_success() {
            error!(
                status = status.as_u16(),
                body = %body,
                "Chat API returned an error response"
            );
            return Err(ChatError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let answer = extract_content(&body).ok_or_else(|| {
            warn!("Unexpected chat API response: {}", body);
            ChatError::Format(body.clone())
        })?;

        info!(
            "Generated response ({} chars) in {:?}",
            answer.len(),
            start_time.elapsed()
        );
        Ok(answer)
    }
}

/// Trimmed `choices[0].message.content`
fn extract_content(body: &str) -> Option<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body).ok()?;
    let content = response.choices.into_iter().next()?.message?.content?;
    Some(content.trim().to_string())
}
