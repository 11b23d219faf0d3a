//! Configuration management for the gateway
//!
//! Supports configuration via:
//! - Environment variables (primary)
//! - Optional TOML config file (secondary)
//!
//! Environment variables take precedence over config file values. AWS
//! credentials are not configured here; they come from the SDK's default
//! provider chain.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Request timeout in seconds (default: 300)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Storage service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Region buckets are created in (default: us-east-1)
    #[serde(default = "default_region")]
    pub region: String,

    /// Endpoint URL for S3-compatible services (MinIO etc.)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Use path-style addressing; required by most S3-compatible services
    #[serde(default)]
    pub force_path_style: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            force_path_style: false,
        }
    }
}

fn default_bind_address() -> SocketAddr {
    "0.0.0.0:8080".parse().unwrap()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage service configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log level used when RUST_LOG is not set (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - S3GATEWAY_BIND_ADDRESS: server bind address (default: 0.0.0.0:8080)
    /// - S3GATEWAY_TIMEOUT_SECS: request timeout (default: 300)
    /// - S3GATEWAY_REGION: region for bucket creation (default: us-east-1)
    /// - S3GATEWAY_ENDPOINT: custom endpoint URL (optional)
    /// - S3GATEWAY_FORCE_PATH_STYLE: path-style addressing (default: false)
    /// - S3GATEWAY_LOG_LEVEL: log level (default: info)
    /// - S3GATEWAY_CONFIG_FILE: optional path to TOML config file
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("S3GATEWAY_CONFIG_FILE") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("S3GATEWAY_BIND_ADDRESS") {
            config.server.bind_address =
                addr.parse().context("parsing S3GATEWAY_BIND_ADDRESS")?;
        }

        if let Ok(timeout) = std::env::var("S3GATEWAY_TIMEOUT_SECS") {
            config.server.timeout_secs =
                timeout.parse().context("parsing S3GATEWAY_TIMEOUT_SECS")?;
        }

        if let Ok(region) = std::env::var("S3GATEWAY_REGION") {
            config.storage.region = region;
        }

        if let Ok(endpoint) = std::env::var("S3GATEWAY_ENDPOINT") {
            config.storage.endpoint = Some(endpoint);
        }

        if let Ok(flag) = std::env::var("S3GATEWAY_FORCE_PATH_STYLE") {
            config.storage.force_path_style = flag
                .parse()
                .context("parsing S3GATEWAY_FORCE_PATH_STYLE")?;
        }

        if let Ok(level) = std::env::var("S3GATEWAY_LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {path}"))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {path}"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind_address.port(), 8080);
        assert_eq!(config.server.timeout_secs, 300);
        assert_eq!(config.storage.region, "us-east-1");
        assert!(config.storage.endpoint.is_none());
        assert!(!config.storage.force_path_style);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            region = "eu-west-1"
            endpoint = "http://localhost:9000"
            force_path_style = true
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.region, "eu-west-1");
        assert_eq!(
            config.storage.endpoint.as_deref(),
            Some("http://localhost:9000")
        );
        assert!(config.storage.force_path_style);
        // untouched sections keep their defaults
        assert_eq!(config.server.timeout_secs, 300);
    }

    #[test]
    fn empty_toml_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.bind_address.port(), 8080);
    }
}
