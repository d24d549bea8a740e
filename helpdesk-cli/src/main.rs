//! Helpdesk CLI - command-line interface for the IT support assistant
//!
//! Loads support documents into the document store and asks questions
//! through the same pipeline the web server uses.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use helpdesk_core::{
    env_vars, init_logging, log_operation_error, log_operation_start, log_operation_success,
    AppConfig, LoggingConfig,
};
use helpdesk_rag::{
    build_http_client, persona, HuggingFaceEmbedder, IngestionPipeline, PersonaCatalog,
    RagPipeline, SupabaseStore,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(about = "IT support assistant backed by retrieved support documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed PDF documents and store them for retrieval
    Ingest {
        /// PDF files to ingest, one stored document per file
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Ask the assistant a question
    Ask {
        /// Question to ask
        question: String,

        /// Persona to answer with (general, duo, rag or one from --personas)
        #[arg(long, default_value = persona::GENERAL)]
        persona: String,

        /// Extra persona definitions (TOML)
        #[arg(long)]
        personas: Option<PathBuf>,
    },

    /// Show the effective configuration with credentials hidden
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut logging_config = LoggingConfig::default();
    if cli.verbose {
        logging_config.level = "debug".to_string();
    }
    init_logging(&logging_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting helpdesk CLI v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Ingest { paths } => handle_ingest(&paths, &config).await,
        Commands::Ask {
            question,
            persona,
            personas,
        } => handle_ask(&question, &persona, personas.as_deref(), &config).await,
        Commands::Config => handle_config(&config),
    }
}

/// Explicit file, else the first default location that exists, else defaults.
/// Environment variables override either.
fn load_config(config_path: Option<&Path>) -> Result<AppConfig> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_paths().into_iter().find(|path| path.exists()),
    };

    match &path {
        Some(path) => info!("Loading configuration from {:?}", path),
        None => info!("No configuration file found, using defaults"),
    }

    AppConfig::load(path.as_deref()).context("Failed to load configuration")
}

fn default_config_paths() -> Vec<PathBuf> {
    [
        dirs::config_dir().map(|d| d.join("helpdesk").join("config.toml")),
        dirs::home_dir().map(|d| d.join(".helpdesk").join("config.toml")),
        Some(PathBuf::from("helpdesk.toml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// The service key when one is set, since inserts usually bypass row-level
/// security; otherwise the configured anon key
fn ingestion_key(config: &AppConfig, service_key: Option<String>) -> Option<String> {
    service_key
        .filter(|key| !key.trim().is_empty())
        .or_else(|| config.store.api_key.clone())
}

async fn handle_ingest(paths: &[PathBuf], config: &AppConfig) -> Result<()> {
    log_operation_start!("ingest_documents", files = paths.len());

    let http = build_http_client(config.upstream_timeout())?;
    let mut store = SupabaseStore::new(config.store.clone(), http.clone());
    match ingestion_key(config, std::env::var(env_vars::STORE_SERVICE_KEY).ok()) {
        Some(key) => store = store.with_api_key(key),
        None => warn!("No Supabase key configured; inserts will fail"),
    }

    let pipeline = IngestionPipeline::new(
        Arc::new(HuggingFaceEmbedder::new(config.embedding.clone(), http)),
        Arc::new(store),
    );

    let mut failed = 0;
    for path in paths {
        match pipeline.ingest_pdf(path).await {
            Ok(document) => println!(
                "✅ {} ({} characters, {}-dimensional embedding)",
                document.source, document.characters, document.dimension
            ),
            Err(e) => {
                log_operation_error!("ingest_document", e, path = %path.display());
                eprintln!("❌ {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} documents failed to ingest", failed, paths.len());
    }

    log_operation_success!("ingest_documents", files = paths.len());
    Ok(())
}

async fn handle_ask(
    question: &str,
    persona_name: &str,
    personas_file: Option<&Path>,
    config: &AppConfig,
) -> Result<()> {
    let http = build_http_client(config.upstream_timeout())?;
    let mut pipeline = RagPipeline::from_config(config, http);
    if let Some(path) = personas_file {
        pipeline = pipeline.with_personas(PersonaCatalog::from_file(path)?);
    }

    let answer = if persona_name == persona::RAG {
        let result = pipeline.ask(Some(question)).await?;
        info!("Answer grounded on {} passages", result.context.len());
        result.answer
    } else {
        pipeline.answer(persona_name, Some(question)).await?
    };

    println!("{}", answer);
    Ok(())
}

fn handle_config(config: &AppConfig) -> Result<()> {
    let mut shown = config.clone();
    let hide = |secret: &mut Option<String>| {
        if secret.is_some() {
            *secret = Some("********".to_string());
        }
    };
    hide(&mut shown.embedding.api_token);
    hide(&mut shown.chat.api_token);
    hide(&mut shown.store.api_key);

    println!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}
