//! Integration test helpers
//!
//! Spawns the full application on an ephemeral port with every upstream
//! service pointed at one wiremock server.

#![allow(dead_code)]

use helpdesk_core::AppConfig;
use helpdesk_web::{create_app, AppState, WebConfig};
use serde_json::json;
use std::sync::LazyLock;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const EMBED_PATH: &str = "/embed";
pub const CHAT_PATH: &str = "/v1/chat/completions";
pub const MATCH_PATH: &str = "/rest/v1/rpc/get_similar_documents";

// Make sure tracing is initialised only once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// Running application and its stubbed upstreams
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub upstream: MockServer,
}

impl TestApp {
    /// POST a JSON body to an assistant endpoint
    pub async fn post_question(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> reqwest::Response {
        self.api_client
            .post(format!("{}{}", &self.address, endpoint))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, endpoint: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", &self.address, endpoint))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Requests the upstream server has seen on `path`
    pub async fn upstream_calls(&self, upstream_path: &str) -> usize {
        self.upstream
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == upstream_path)
            .count()
    }

    /// Embedding service answers every input with `vector`
    pub async fn mount_embedding(&self, vector: &[f32]) {
        Mock::given(method("POST"))
            .and(path(EMBED_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([vector])))
            .mount(&self.upstream)
            .await;
    }

    /// Similarity search returns `contexts`, most similar first
    pub async fn mount_store(&self, contexts: &[&str]) {
        let rows: Vec<_> = contexts
            .iter()
            .map(|context| json!({"doc_context": context}))
            .collect();
        Mock::given(method("POST"))
            .and(path(MATCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.upstream)
            .await;
    }

    /// Chat service answers with the prompt it received
    pub async fn mount_echo_chat(&self) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(EchoCompletion)
            .mount(&self.upstream)
            .await;
    }

    /// Upstream `path` answers only after `delay`
    pub async fn mount_slow(&self, upstream_path: &str, delay: std::time::Duration) {
        Mock::given(method("POST"))
            .and(path(upstream_path))
            .respond_with(ResponseTemplate::new(200).set_delay(delay))
            .mount(&self.upstream)
            .await;
    }

    /// Chat service answers with a bare status
    pub async fn mount_chat_status(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
            .mount(&self.upstream)
            .await;
    }
}

/// Completion whose content is every message content joined by newlines
pub struct EchoCompletion;

impl Respond for EchoCompletion {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let prompt = body["messages"]
            .as_array()
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(|m| m["content"].as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": prompt}}]
        }))
    }
}

/// Upstream settings with every credential present
pub fn upstream_config(upstream: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.embedding.api_url = format!("{}{}", upstream.uri(), EMBED_PATH);
    config.embedding.api_token = Some("vector-token".to_string());
    config.chat.api_url = format!("{}{}", upstream.uri(), CHAT_PATH);
    config.chat.api_token = Some("chat-token".to_string());
    config.store.url = Some(upstream.uri());
    config.store.api_key = Some("anon-key".to_string());
    config.upstream_timeout_secs = 5;
    config
}

/// Start the application with all credentials configured
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Start the application after adjusting its upstream settings
pub async fn spawn_app_with<F>(configure: F) -> TestApp
where
    F: FnOnce(&mut AppConfig),
{
    LazyLock::force(&TRACING);

    let upstream = MockServer::start().await;
    let mut app_config = upstream_config(&upstream);
    configure(&mut app_config);

    let config = WebConfig {
        port: 0, // Let the OS choose a free port
        ..WebConfig::default()
    };
    let state = AppState::new(config, &app_config).expect("Failed to build application state");
    let app = create_app(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        port,
        api_client: client,
        upstream,
    }
}
