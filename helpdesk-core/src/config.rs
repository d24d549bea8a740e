//! Configuration loading
//!
//! Defaults, optional TOML file, then environment overrides.

use crate::error::{ErrorContext, HelpdeskError, HelpdeskResult};
use crate::types::{AppConfig, ChatServiceConfig, DocumentStoreConfig, EmbeddingServiceConfig};
use crate::validation_error;

use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CHAT_MODEL: &str = "meta-llama/llama-3-8b-instruct";
pub const DEFAULT_CHAT_API_URL: &str =
    "https://router.huggingface.co/novita/v3/openai/chat/completions";
pub const DEFAULT_EMBEDDING_MODEL: &str = "intfloat/e5-base-v2";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 45;

/// Environment variable names read by [`AppConfig::from_env`]
pub mod env_vars {
    pub const EMBEDDING_TOKEN: &str = "HUGGING_FACE_VECTOR_API_TOKEN";
    pub const EMBEDDING_URL: &str = "EMBEDDING_API_URL";
    pub const EMBEDDING_MODEL: &str = "EMBEDDING_MODEL_ID";
    pub const CHAT_TOKEN: &str = "HUGGING_FACE_API_TOKEN";
    pub const CHAT_URL: &str = "CHAT_API_URL";
    pub const CHAT_MODEL: &str = "CHAT_MODEL";
    pub const STORE_URL: &str = "SUPABASE_URL";
    pub const STORE_KEY: &str = "SUPABASE_ANON_KEY";
    pub const STORE_SERVICE_KEY: &str = "SUPABASE_SERVICE_KEY";
    pub const UPSTREAM_TIMEOUT: &str = "HELPDESK_UPSTREAM_TIMEOUT_SECS";
}

/// Feature-extraction URL of the hosted inference router for `model`
pub fn embedding_url_for_model(model: &str) -> String {
    format!(
        "https://router.huggingface.co/hf-inference/models/{}/pipeline/feature-extraction",
        model
    )
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingServiceConfig::default(),
            chat: ChatServiceConfig::default(),
            store: DocumentStoreConfig::default(),
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
        }
    }
}

impl Default for EmbeddingServiceConfig {
    fn default() -> Self {
        Self {
            api_url: embedding_url_for_model(DEFAULT_EMBEDDING_MODEL),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_token: None,
        }
    }
}

impl Default for ChatServiceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_CHAT_API_URL.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            api_token: None,
            max_tokens: 512,
            temperature: 0.6,
        }
    }
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            match_function: "get_similar_documents".to_string(),
            table: "documents".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> HelpdeskResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| HelpdeskError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| HelpdeskError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Defaults, then the optional TOML file, then the process environment.
    /// The result is validated.
    pub fn load(path: Option<&Path>) -> HelpdeskResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_with(|key| std::env::var(key).ok());
        config
    }

    /// Override fields from a variable lookup. Empty values count as unset.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(token) = get(env_vars::EMBEDDING_TOKEN) {
            self.embedding.api_token = Some(token);
        }
        if let Some(model) = get(env_vars::EMBEDDING_MODEL) {
            self.embedding.api_url = embedding_url_for_model(&model);
            self.embedding.model = model;
        }
        if let Some(url) = get(env_vars::EMBEDDING_URL) {
            self.embedding.api_url = url;
        }

        if let Some(token) = get(env_vars::CHAT_TOKEN) {
            self.chat.api_token = Some(token);
        }
        if let Some(url) = get(env_vars::CHAT_URL) {
            self.chat.api_url = url;
        }
        if let Some(model) = get(env_vars::CHAT_MODEL) {
            self.chat.model = model;
        }

        if let Some(url) = get(env_vars::STORE_URL) {
            self.store.url = Some(url);
        }
        if let Some(key) = get(env_vars::STORE_KEY) {
            self.store.api_key = Some(key);
        }

        if let Some(secs) = get(env_vars::UPSTREAM_TIMEOUT).and_then(|s| s.parse().ok()) {
            self.upstream_timeout_secs = secs;
        }
    }

    /// Timeout applied to every upstream call
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Validate settings. Credentials are deliberately not checked here: each
    /// client reports its own missing credential when it is used.
    pub fn validate(&self) -> HelpdeskResult<()> {
        if self.upstream_timeout_secs == 0 {
            return Err(validation_error!(
                "Upstream timeout must be greater than 0",
                "upstream_timeout_secs",
                "config"
            ));
        }

        if self.chat.max_tokens == 0 {
            return Err(validation_error!(
                "Chat max_tokens must be greater than 0",
                "chat.max_tokens",
                "config"
            ));
        }

        if !(0.0..=2.0).contains(&self.chat.temperature) {
            return Err(validation_error!(
                format!(
                    "Chat temperature must be between 0.0 and 2.0, got {}",
                    self.chat.temperature
                ),
                "chat.temperature",
                "config"
            ));
        }

        check_url(&self.embedding.api_url, "embedding.api_url")?;
        check_url(&self.chat.api_url, "chat.api_url")?;
        if let Some(url) = &self.store.url {
            check_url(url, "store.url")?;
        }

        Ok(())
    }
}

fn check_url(value: &str, field: &str) -> HelpdeskResult<()> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| validation_error!(format!("Invalid URL '{}': {}", value, e), field, "config"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_hosted_services() {
        let config = AppConfig::default();
        assert_eq!(config.chat.model, "meta-llama/llama-3-8b-instruct");
        assert_eq!(config.chat.max_tokens, 512);
        assert!((config.chat.temperature - 0.6).abs() < f32::EPSILON);
        assert!(config.embedding.api_url.ends_with(
            "/models/intfloat/e5-base-v2/pipeline/feature-extraction"
        ));
        assert_eq!(config.store.match_function, "get_similar_documents");
        assert_eq!(config.upstream_timeout(), Duration::from_secs(45));
        assert!(config.chat.api_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env_with(lookup(&[
            ("HUGGING_FACE_API_TOKEN", "chat-token"),
            ("HUGGING_FACE_VECTOR_API_TOKEN", "vector-token"),
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("EMBEDDING_MODEL_ID", "BAAI/bge-small-en-v1.5"),
            ("HELPDESK_UPSTREAM_TIMEOUT_SECS", "10"),
        ]));

        assert_eq!(config.chat.api_token.as_deref(), Some("chat-token"));
        assert_eq!(config.embedding.api_token.as_deref(), Some("vector-token"));
        assert_eq!(
            config.store.url.as_deref(),
            Some("https://project.supabase.co")
        );
        assert_eq!(config.store.api_key.as_deref(), Some("anon"));
        assert_eq!(config.embedding.model, "BAAI/bge-small-en-v1.5");
        assert!(config.embedding.api_url.contains("BAAI/bge-small-en-v1.5"));
        assert_eq!(config.upstream_timeout_secs, 10);
    }

    #[test]
    fn test_explicit_embedding_url_wins_over_model() {
        let mut config = AppConfig::default();
        config.apply_env_with(lookup(&[
            ("EMBEDDING_MODEL_ID", "other/model"),
            ("EMBEDDING_API_URL", "http://127.0.0.1:9000/embed"),
        ]));
        assert_eq!(config.embedding.api_url, "http://127.0.0.1:9000/embed");
        assert_eq!(config.embedding.model, "other/model");
    }

    #[test]
    fn test_blank_credentials_are_unset() {
        let mut config = AppConfig::default();
        config.apply_env_with(lookup(&[("HUGGING_FACE_API_TOKEN", "   ")]));
        assert!(config.chat.api_token.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.chat.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.upstream_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.store.url = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_fills_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("helpdesk.toml");
        std::fs::write(
            &path,
            r#"
upstream_timeout_secs = 20

[chat]
model = "mistralai/mistral-7b-instruct"
temperature = 0.2

[store]
url = "https://project.supabase.co"
"#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.upstream_timeout_secs, 20);
        assert_eq!(config.chat.model, "mistralai/mistral-7b-instruct");
        assert_eq!(config.chat.max_tokens, 512);
        assert_eq!(config.embedding.model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.store.table, "documents");
    }

    #[test]
    fn test_load_validates_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("helpdesk.toml");
        std::fs::write(&path, "[chat]\nmax_tokens = 0\n").unwrap();

        assert!(AppConfig::load(Some(&path)).is_err());
        assert!(AppConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "upstream_timeout_secs = [").unwrap();

        match AppConfig::from_file(&path) {
            Err(HelpdeskError::Config { context, .. }) => {
                assert_eq!(context.operation.as_deref(), Some("parse_toml"))
            }
            other => panic!("Expected config error, got {:?}", other.map(|_| ())),
        }
    }
}
