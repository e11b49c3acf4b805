//! Configuration loading and credential resolution
//!
//! Bootstrap configuration comes from a small TOML file. Every field is
//! optional: a missing or unreadable file logs a warning and falls back to
//! compiled defaults, it never aborts startup.
//!
//! Credential priority order:
//! 1. Environment variable (highest priority)
//! 2. TOML config file
//! 3. None (the endpoint needing it answers 500)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable holding the vision model credential
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable holding the weather provider credential
pub const OPENWEATHER_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5780;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_ITUNES_BASE_URL: &str = "https://itunes.apple.com";

/// Bootstrap configuration loaded from TOML file
///
/// These settings cannot change during runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Bind address for the proxy
    #[serde(default)]
    pub host: Option<String>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Vision model credential (overridden by GEMINI_API_KEY)
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Weather provider credential (overridden by OPENWEATHER_API_KEY)
    #[serde(default)]
    pub openweather_api_key: Option<String>,

    /// Upstream base URLs
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream provider endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_openweather_base_url")]
    pub openweather_base_url: String,

    #[serde(default = "default_itunes_base_url")]
    pub itunes_base_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            gemini_base_url: default_gemini_base_url(),
            gemini_model: default_gemini_model(),
            openweather_base_url: default_openweather_base_url(),
            itunes_base_url: default_itunes_base_url(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_openweather_base_url() -> String {
    DEFAULT_OPENWEATHER_BASE_URL.to_string()
}

fn default_itunes_base_url() -> String {
    DEFAULT_ITUNES_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default config file path for a module: `<config_dir>/vibesync/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vibesync").join(format!("{}.toml", module_name)))
}

/// Parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load config with graceful degradation
///
/// A missing file is normal (defaults, info log). An unreadable or invalid
/// file is a warning, also falling back to defaults.
pub fn load_toml_config(path: Option<&Path>) -> TomlConfig {
    let Some(path) = path else {
        info!("No config directory available, using built-in defaults");
        return TomlConfig::default();
    };

    if !path.exists() {
        info!("Config file {} not found, using built-in defaults", path.display());
        return TomlConfig::default();
    }

    match read_toml_config(path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Ignoring config file: {}", e);
            TomlConfig::default()
        }
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve a credential from environment, then TOML
///
/// Returns `None` when neither source holds a valid key.
pub fn resolve_credential(env_var: &str, toml_value: Option<&str>) -> Option<String> {
    let env_key = std::env::var(env_var).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_value.filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "{} found in both environment and TOML config. Using environment (highest priority).",
            env_var
        );
    }

    if let Some(key) = env_key {
        info!("{} loaded from environment variable", env_var);
        return Some(key.trim().to_string());
    }

    if let Some(key) = toml_key {
        info!("{} loaded from TOML config", env_var);
        return Some(key.trim().to_string());
    }

    warn!("{} not configured", env_var);
    None
}
