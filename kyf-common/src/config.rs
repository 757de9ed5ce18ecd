//! Configuration file loading for KYF services
//!
//! Each service resolves its settings through the same tiers:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file (`~/.config/kyf/<service>.toml`)
//! 4. Compiled default (fallback)
//!
//! This module owns tiers 3 and 4: locating and loading the per-service
//! TOML file, degrading gracefully (a missing or unreadable file yields
//! the service's compiled defaults with a warning, never a startup
//! failure). The service-side `config.rs` composes the full chain.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Logging configuration shared by all services
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Platform config file path for a service, e.g. `~/.config/kyf/kyf-ai.toml`
pub fn config_file_path(service_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kyf").join(format!("{}.toml", service_name)))
}

/// Parse a service TOML file at an explicit path
pub fn load_config_from<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Load a service's TOML configuration, degrading to defaults.
///
/// A missing file is normal (first run, container deployments configured
/// purely via environment); a present-but-broken file is reported but does
/// not prevent startup.
pub fn load_service_config<T: DeserializeOwned + Default>(service_name: &str) -> T {
    let Some(path) = config_file_path(service_name) else {
        warn!("Could not determine config directory; using compiled defaults");
        return T::default();
    };

    if !path.exists() {
        info!("No config file at {}; using compiled defaults", path.display());
        return T::default();
    }

    match load_config_from(&path) {
        Ok(config) => {
            info!("Loaded configuration from {}", path.display());
            config
        }
        Err(e) => {
            warn!("{}; using compiled defaults", e);
            T::default()
        }
    }
}
