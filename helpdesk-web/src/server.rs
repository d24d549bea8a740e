//! Helpdesk Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebConfig, WebError, WebResult};
use axum::serve;
use helpdesk_core::AppConfig;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Main helpdesk web server
pub struct HelpdeskServer {
    config: WebConfig,
    state: AppState,
}

impl HelpdeskServer {
    /// Create a new server for the given upstream settings
    pub fn new(config: WebConfig, app_config: &AppConfig) -> WebResult<Self> {
        let state = AppState::new(config.clone(), app_config)?;

        Ok(Self { config, state })
    }

    /// Start the web server
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("🚀 Starting Helpdesk Web Server");
        info!("📍 Server address: http://{}", address);
        if self.config.allowed_origins.is_empty() {
            warn!("CORS allows any origin; set HELPDESK_ALLOWED_ORIGINS to restrict it");
        }

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("✅ Server listening on http://{}", address);

        if let Err(e) = serve(listener, app).await {
            error!("❌ Server error: {}", e);
            return Err(WebError::Server(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for HelpdeskServer
pub struct HelpdeskServerBuilder {
    config: WebConfig,
    app_config: AppConfig,
}

impl HelpdeskServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: WebConfig::default(),
            app_config: AppConfig::default(),
        }
    }

    /// Start from an existing web configuration
    pub fn config(mut self, config: WebConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the upstream service settings
    pub fn app_config(mut self, app_config: AppConfig) -> Self {
        self.app_config = app_config;
        self
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Add an allowed CORS origin
    pub fn allow_origin<S: Into<String>>(mut self, origin: S) -> Self {
        self.config.allowed_origins.push(origin.into());
        self
    }

    /// Build the server
    pub fn build(self) -> WebResult<HelpdeskServer> {
        HelpdeskServer::new(self.config, &self.app_config)
    }
}

impl Default for HelpdeskServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
