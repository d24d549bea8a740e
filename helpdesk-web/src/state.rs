//! Application state shared by all handlers

use crate::{WebConfig, WebResult};
use helpdesk_core::AppConfig;
use helpdesk_rag::{build_http_client, PersonaCatalog, RagPipeline};
use std::sync::Arc;
use tracing::info;

/// Read-only state: server settings and the question pipeline
#[derive(Clone)]
pub struct AppState {
    pub config: WebConfig,
    pub pipeline: Arc<RagPipeline>,
}

impl AppState {
    /// Build the pipeline for the hosted services in `app_config`
    pub fn new(config: WebConfig, app_config: &AppConfig) -> WebResult<Self> {
        let http = build_http_client(app_config.upstream_timeout())?;
        let mut pipeline = RagPipeline::from_config(app_config, http);

        if let Some(path) = &config.personas_file {
            let personas = PersonaCatalog::from_file(path)?;
            info!(
                "Loaded personas from {}: {}",
                path.display(),
                personas.names().join(", ")
            );
            pipeline = pipeline.with_personas(personas);
        }

        Ok(Self::with_pipeline(config, pipeline))
    }

    /// State around an already built pipeline
    pub fn with_pipeline(config: WebConfig, pipeline: RagPipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }
}
