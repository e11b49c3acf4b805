//! Runtime configuration for vibesync-proxy
//!
//! Resolved once at startup from command-line arguments, environment and
//! the TOML bootstrap file, then passed to handlers through `AppState`.
//!
//! Priority for host/port: command line (or its env var) → TOML → default.
//! Priority for credentials: environment → TOML → absent.

use vibesync_common::config::{
    resolve_credential, TomlConfig, UpstreamConfig, DEFAULT_HOST, DEFAULT_PORT,
    GEMINI_API_KEY_ENV, OPENWEATHER_API_KEY_ENV,
};

/// Largest accepted request body (base64 photos are large)
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Fully resolved proxy configuration
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    /// Vision model credential; `None` makes /api/analyze answer 500
    pub gemini_api_key: Option<String>,
    /// Weather credential; `None` makes /api/weather answer 500
    pub openweather_api_key: Option<String>,
    pub upstream: UpstreamConfig,
    pub max_body_bytes: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            gemini_api_key: None,
            openweather_api_key: None,
            upstream: UpstreamConfig::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ProxyConfig {
    /// Resolve configuration from CLI overrides, environment and TOML
    pub fn resolve(host: Option<String>, port: Option<u16>, toml_config: TomlConfig) -> Self {
        let gemini_api_key =
            resolve_credential(GEMINI_API_KEY_ENV, toml_config.gemini_api_key.as_deref());
        let openweather_api_key = resolve_credential(
            OPENWEATHER_API_KEY_ENV,
            toml_config.openweather_api_key.as_deref(),
        );

        Self {
            host: host
                .or(toml_config.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: port.or(toml_config.port).unwrap_or(DEFAULT_PORT),
            gemini_api_key,
            openweather_api_key,
            upstream: toml_config.upstream,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_cli_overrides_toml() {
        let toml_config = TomlConfig {
            host: Some("0.0.0.0".to_string()),
            port: Some(7000),
            ..Default::default()
        };

        let config = ProxyConfig::resolve(None, Some(8000), toml_config);

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    #[serial]
    fn test_credentials_from_toml() {
        std::env::remove_var(GEMINI_API_KEY_ENV);
        std::env::remove_var(OPENWEATHER_API_KEY_ENV);

        let toml_config = TomlConfig {
            gemini_api_key: Some("g-key".to_string()),
            ..Default::default()
        };

        let config = ProxyConfig::resolve(None, None, toml_config);

        assert_eq!(config.gemini_api_key.as_deref(), Some("g-key"));
        assert!(config.openweather_api_key.is_none());
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
