//! Configuration resolution for kyf-ai
//!
//! Per-value priority: CLI argument → environment variable → TOML file
//! (`~/.config/kyf/kyf-ai.toml`) → compiled default. The LLM API key is
//! the only value with no default; startup fails without it.

use kyf_common::config::LoggingConfig;
use kyf_common::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

/// Default HTTP port for kyf-ai
pub const DEFAULT_PORT: u16 = 8300;

const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
const DEFAULT_FACE_ENGINE_URL: &str = "http://127.0.0.1:8501";
const DEFAULT_SENTIMENT_ENGINE_URL: &str = "http://127.0.0.1:8502";
const DEFAULT_TRANSLATE_URL: &str = "https://api.mymemory.translated.net";
const DEFAULT_UPLOAD_DIR: &str = "temp";
const DEFAULT_FACE_TOLERANCE: f64 = 0.6;

/// Bootstrap configuration loaded from the TOML file.
///
/// Every field is optional; absent values fall through to environment
/// variables and compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_model: Option<String>,
    #[serde(default)]
    pub llm_base_url: Option<String>,
    #[serde(default)]
    pub face_engine_url: Option<String>,
    #[serde(default)]
    pub sentiment_engine_url: Option<String>,
    #[serde(default)]
    pub translate_url: Option<String>,
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,
    #[serde(default)]
    pub face_match_tolerance: Option<f64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub upload_dir: Option<PathBuf>,
}

/// Resolved kyf-ai configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub port: u16,
    /// API key for the LLM provider (required)
    pub llm_api_key: String,
    /// Model identifier passed to the LLM provider
    pub llm_model: String,
    /// Base URL of the OpenAI-compatible chat completions API
    pub llm_base_url: String,
    /// Base URL of the face-embedding engine sidecar
    pub face_engine_url: String,
    /// Base URL of the sentiment-classification engine sidecar
    pub sentiment_engine_url: String,
    /// Base URL of the translation service
    pub translate_url: String,
    /// Directory uploaded files are written to
    pub upload_dir: PathBuf,
    /// Maximum embedding distance still counted as a face match
    pub face_match_tolerance: f64,
}

impl Config {
    /// Resolve the full configuration over an already-loaded TOML layer.
    ///
    /// The caller loads the TOML file (via
    /// `kyf_common::config::load_service_config`) so the `[logging]`
    /// section can configure tracing before resolution runs.
    ///
    /// # Errors
    ///
    /// Fails only when no LLM API key can be found in any tier.
    pub fn from_sources(overrides: ConfigOverrides, toml_config: TomlConfig) -> Result<Self> {
        let llm_api_key = resolve_llm_api_key(&toml_config)?;

        let port = overrides
            .port
            .or_else(|| env_parse("KYF_AI_PORT"))
            .or(toml_config.port)
            .unwrap_or(DEFAULT_PORT);

        let upload_dir = overrides
            .upload_dir
            .or_else(|| env_string("KYF_UPLOAD_DIR").map(PathBuf::from))
            .or(toml_config.upload_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let llm_model = env_string("OPENAI_API_MODEL")
            .or(toml_config.openai_api_model)
            .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string());

        let llm_base_url = env_string("KYF_LLM_BASE_URL")
            .or(toml_config.llm_base_url)
            .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());

        let face_engine_url = env_string("KYF_FACE_ENGINE_URL")
            .or(toml_config.face_engine_url)
            .unwrap_or_else(|| DEFAULT_FACE_ENGINE_URL.to_string());

        let sentiment_engine_url = env_string("KYF_SENTIMENT_ENGINE_URL")
            .or(toml_config.sentiment_engine_url)
            .unwrap_or_else(|| DEFAULT_SENTIMENT_ENGINE_URL.to_string());

        let translate_url = env_string("KYF_TRANSLATE_URL")
            .or(toml_config.translate_url)
            .unwrap_or_else(|| DEFAULT_TRANSLATE_URL.to_string());

        let face_match_tolerance = env_parse("KYF_FACE_TOLERANCE")
            .or(toml_config.face_match_tolerance)
            .unwrap_or(DEFAULT_FACE_TOLERANCE);

        Ok(Config {
            port,
            llm_api_key,
            llm_model,
            llm_base_url,
            face_engine_url,
            sentiment_engine_url,
            translate_url,
            upload_dir,
            face_match_tolerance,
        })
    }
}

/// Resolve the LLM API key from environment then TOML.
///
/// Warns when the key is present in both sources (potential
/// misconfiguration), then uses the environment value.
fn resolve_llm_api_key(toml_config: &TomlConfig) -> Result<String> {
    let env_key = env_string("OPENAI_API_KEY");
    let toml_key = toml_config
        .openai_api_key
        .as_ref()
        .filter(|key| !key.trim().is_empty());

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "LLM API key found in both environment and TOML config. \
             Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        return Ok(key);
    }
    if let Some(key) = toml_key {
        return Ok(key.clone());
    }

    Err(Error::Config(
        "LLM API key not configured. Please configure using one of:\n\
         1. Environment: OPENAI_API_KEY=your-key-here\n\
         2. TOML config: ~/.config/kyf/kyf-ai.toml (openai_api_key = \"your-key\")"
            .to_string(),
    ))
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

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: &[&str] = &[
        "OPENAI_API_KEY",
        "OPENAI_API_MODEL",
        "KYF_AI_PORT",
        "KYF_UPLOAD_DIR",
        "KYF_LLM_BASE_URL",
        "KYF_FACE_ENGINE_URL",
        "KYF_SENTIMENT_ENGINE_URL",
        "KYF_TRANSLATE_URL",
        "KYF_FACE_TOLERANCE",
    ];

    fn clear_env() {
        for name in ENV_VARS {
            std::env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn missing_api_key_fails_resolution() {
        clear_env();
        let result = Config::from_sources(ConfigOverrides::default(), TomlConfig::default());
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn defaults_apply_when_only_the_key_is_set() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "test-key");

        let config =
            Config::from_sources(ConfigOverrides::default(), TomlConfig::default()).unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.llm_api_key, "test-key");
        assert_eq!(config.llm_model, DEFAULT_LLM_MODEL);
        assert_eq!(config.llm_base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(config.face_match_tolerance, DEFAULT_FACE_TOLERANCE);
        assert_eq!(config.upload_dir, PathBuf::from(DEFAULT_UPLOAD_DIR));

        clear_env();
    }

    #[test]
    #[serial]
    fn toml_key_is_used_when_env_is_absent() {
        clear_env();
        let toml_config = TomlConfig {
            openai_api_key: Some("toml-key".to_string()),
            ..TomlConfig::default()
        };

        let config = Config::from_sources(ConfigOverrides::default(), toml_config).unwrap();
        assert_eq!(config.llm_api_key, "toml-key");
    }

    #[test]
    #[serial]
    fn env_beats_toml_for_the_model() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "test-key");
        std::env::set_var("OPENAI_API_MODEL", "gpt-4o");
        let toml_config = TomlConfig {
            openai_api_model: Some("toml-model".to_string()),
            ..TomlConfig::default()
        };

        let config = Config::from_sources(ConfigOverrides::default(), toml_config).unwrap();
        assert_eq!(config.llm_model, "gpt-4o");

        clear_env();
    }

    #[test]
    #[serial]
    fn cli_override_beats_env_and_toml_for_the_port() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "test-key");
        std::env::set_var("KYF_AI_PORT", "9100");
        let toml_config = TomlConfig {
            port: Some(9200),
            ..TomlConfig::default()
        };
        let overrides = ConfigOverrides {
            port: Some(9300),
            ..ConfigOverrides::default()
        };

        let config = Config::from_sources(overrides, toml_config).unwrap();
        assert_eq!(config.port, 9300);

        clear_env();
    }

    #[test]
    #[serial]
    fn unparseable_port_env_falls_through() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "test-key");
        std::env::set_var("KYF_AI_PORT", "not-a-port");

        let config =
            Config::from_sources(ConfigOverrides::default(), TomlConfig::default()).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);

        clear_env();
    }

    #[test]
    #[serial]
    fn empty_env_key_counts_as_absent() {
        clear_env();
        std::env::set_var("OPENAI_API_KEY", "   ");

        let result = Config::from_sources(ConfigOverrides::default(), TomlConfig::default());
        assert!(result.is_err());

        clear_env();
    }
}
