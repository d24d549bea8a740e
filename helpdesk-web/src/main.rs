//! Helpdesk Web Server
//!
//! HTTP API for the IT support assistant.

use clap::Parser;
use helpdesk_core::{init_logging, AppConfig, LoggingConfig};
use helpdesk_web::server::HelpdeskServerBuilder;
use helpdesk_web::WebConfig;
use std::path::PathBuf;

/// Helpdesk Web Server - IT support assistant API
#[derive(Parser)]
#[command(name = "helpdesk-web")]
#[command(about = "HTTP API for the IT helpdesk assistant")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Upstream service settings (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Persona definitions (TOML)
    #[arg(long)]
    personas: Option<PathBuf>,

    /// Allowed CORS origin; repeat for several
    #[arg(long = "allow-origin")]
    allow_origins: Vec<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let mut logging = LoggingConfig::default().with_level(&args.log_level);
    if args.json_logs {
        logging.format = helpdesk_core::LogFormat::Json;
    }
    if let Err(e) = init_logging(&logging) {
        eprintln!("❌ Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    // Environment first, command line arguments on top
    let mut config = WebConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.config.is_some() {
        config.config_file = args.config;
    }
    if args.personas.is_some() {
        config.personas_file = args.personas;
    }
    if !args.allow_origins.is_empty() {
        config.allowed_origins = args.allow_origins;
    }

    let app_config = match AppConfig::load(config.config_file.as_deref()) {
        Ok(app_config) => app_config,
        Err(e) => {
            e.log();
            eprintln!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut missing_vars = Vec::new();
    if app_config.chat.api_token.is_none() {
        missing_vars.push(helpdesk_core::env_vars::CHAT_TOKEN);
    }
    if app_config.embedding.api_token.is_none() {
        missing_vars.push(helpdesk_core::env_vars::EMBEDDING_TOKEN);
    }
    if app_config.store.url.is_none() || app_config.store.api_key.is_none() {
        missing_vars.push("SUPABASE_URL / SUPABASE_ANON_KEY");
    }
    if !missing_vars.is_empty() {
        tracing::warn!(
            "Missing environment variables: {}. The server will start but the endpoints that need them will fail.",
            missing_vars.join(", ")
        );
    }

    let server = match HelpdeskServerBuilder::new()
        .config(config)
        .app_config(app_config)
        .build()
    {
        Ok(server) => server,
        Err(e) => {
            eprintln!("❌ Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        eprintln!("❌ Server failed to start: {}", e);
        std::process::exit(1);
    }
}
