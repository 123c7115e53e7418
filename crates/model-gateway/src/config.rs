//! Configuration types and loading logic.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use gateway_tracing::TracingConfig;
use serde::Deserialize;

/// Top-level gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub tracing: TracingConfig,
}

/// Server listen configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
}

/// Upstream prediction/model-registry service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,

    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

/// API key authentication configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Comma-separated list of accepted API keys. Empty means every
    /// protected request is rejected until keys are configured.
    #[serde(default)]
    pub api_keys: String,
}

fn default_listen_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_upstream_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_upstream_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_base_url(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from TOML file and environment variables.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (GATEWAY_ prefix, __ for nesting)
    /// 2. TOML config file
    /// 3. Defaults
    pub fn load(config_path: &str) -> anyhow::Result<Self> {
        let mut config: GatewayConfig = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("GATEWAY_").split("__"))
            .extract()?;

        // Direct env var overrides for deploy-critical values
        if let Ok(keys) = std::env::var("GATEWAY_API_KEYS") {
            config.auth.api_keys = keys;
        }
        if let Ok(url) = std::env::var("GATEWAY_UPSTREAM_URL") {
            config.upstream.base_url = url;
        }
        if let Ok(addr) = std::env::var("GATEWAY_LISTEN_ADDRESS") {
            config.server.listen_address = addr;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let config = GatewayConfig::load("does-not-exist.toml").unwrap();
        assert_eq!(config.server.listen_address, "0.0.0.0:3000");
        assert_eq!(config.upstream.base_url, "http://localhost:8000");
        assert_eq!(config.upstream.timeout_secs, 30);
        assert!(config.auth.api_keys.is_empty());
        assert_eq!(config.tracing.service_name, "model-gateway");
    }
}
