//! kyf-id - Document OCR microservice
//!
//! Minimal sidecar wrapping the tesseract binary: accepts an uploaded
//! identity document image and returns the extracted text.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use kyf_id::config::{Config, ConfigOverrides, TomlConfig};
use kyf_id::{build_router, AppState};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "kyf-id", about = "Know Your Fan document OCR service")]
struct Cli {
    /// HTTP port to listen on
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // TOML layer first: its [logging] section feeds the subscriber,
    // RUST_LOG still wins when set
    let toml_config: TomlConfig = kyf_common::config::load_service_config("kyf-id");
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml_config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Build identification immediately after tracing init
    info!(
        "Starting Know Your Fan OCR service (kyf-id) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = Config::from_sources(ConfigOverrides { port: cli.port }, toml_config);

    let state = AppState::new(&config);
    if state.ocr.is_available() {
        info!("Tesseract binary found: {}", config.tesseract_binary);
    } else {
        warn!(
            "Tesseract binary '{}' not found; /validate-id will answer 503 until it is installed",
            config.tesseract_binary
        );
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    info!("kyf-id listening on http://127.0.0.1:{}", config.port);
    info!("Health check: http://127.0.0.1:{}/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
