//! kyf-ai - Fan analysis microservice
//!
//! Orchestrates the LLM, the face-embedding engine, the sentiment
//! engine and the translation service to turn uploaded documents,
//! selfies and registration data into a verified fan profile.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use kyf_ai::config::{Config, ConfigOverrides, TomlConfig};
use kyf_ai::{build_router, AppState};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "kyf-ai", about = "Know Your Fan AI orchestration service")]
struct Cli {
    /// HTTP port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Directory uploaded images are written to
    #[arg(long)]
    upload_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // TOML layer first: its [logging] section feeds the subscriber,
    // RUST_LOG still wins when set
    let toml_config: TomlConfig = kyf_common::config::load_service_config("kyf-ai");
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml_config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Build identification immediately after tracing init
    info!(
        "Starting Know Your Fan AI service (kyf-ai) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = Config::from_sources(
        ConfigOverrides {
            port: cli.port,
            upload_dir: cli.upload_dir,
        },
        toml_config,
    )?;

    info!("LLM model: {}", config.llm_model);
    info!("Upload directory: {}", config.upload_dir.display());

    let state = AppState::new(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    info!("kyf-ai listening on http://127.0.0.1:{}", config.port);
    info!("Health check: http://127.0.0.1:{}/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
