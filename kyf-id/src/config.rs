//! Configuration resolution for kyf-id
//!
//! Per-value priority: CLI argument → environment variable → TOML file
//! (`~/.config/kyf/kyf-id.toml`) → compiled default. Every value has a
//! default; resolution never fails.

use kyf_common::config::LoggingConfig;
use serde::Deserialize;
use tracing::warn;

/// Default HTTP port for kyf-id
pub const DEFAULT_PORT: u16 = 8301;

const DEFAULT_TESSERACT_BINARY: &str = "tesseract";

/// Bootstrap configuration loaded from the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub tesseract_binary: Option<String>,
    #[serde(default)]
    pub tesseract_language: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
}

/// Resolved kyf-id configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub port: u16,
    /// Tesseract binary name or path
    pub tesseract_binary: String,
    /// Language pack passed as `-l`; tesseract's default when absent
    pub tesseract_language: Option<String>,
}

impl Config {
    /// Resolve the full configuration over an already-loaded TOML layer.
    pub fn from_sources(overrides: ConfigOverrides, toml_config: TomlConfig) -> Self {
        let port = overrides
            .port
            .or_else(|| env_parse("KYF_ID_PORT"))
            .or(toml_config.port)
            .unwrap_or(DEFAULT_PORT);

        let tesseract_binary = env_string("KYF_TESSERACT_BINARY")
            .or(toml_config.tesseract_binary)
            .unwrap_or_else(|| DEFAULT_TESSERACT_BINARY.to_string());

        let tesseract_language =
            env_string("KYF_TESSERACT_LANGUAGE").or(toml_config.tesseract_language);

        Config {
            port,
            tesseract_binary,
            tesseract_language,
        }
    }
}

/// Non-empty environment string
fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parsed environment value; malformed values are reported and skipped
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env_string(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {} value: {}", name, raw);
            None
        }
    }
}
