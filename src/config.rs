//! Configuration management

use std::path::Path;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Upstream API configuration
    pub upstream: UpstreamConfig,
    /// Response cache configuration
    pub cache: CacheConfig,
    /// CORS configuration
    pub cors: CorsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

/// Upstream product API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the product API
    pub base_url: String,
    /// Transport timeout for upstream requests
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dummyjson.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Response cache configuration
///
/// TTLs govern staleness only — the cache layer enforces no deadline on
/// the upstream fetch itself (that is the upstream client's timeout).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Default TTL for cached responses
    #[serde(with = "humantime_serde")]
    pub default_ttl: Duration,
    /// TTL for the category listing, which changes more slowly
    #[serde(with = "humantime_serde")]
    pub categories_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300),
            categories_ttl: Duration::from_secs(600),
        }
    }
}

/// CORS configuration for browser clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed browser origins
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:5174".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file does not exist or cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        // Load from file if provided
        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Yaml::file(p));
        }

        // Merge environment variables (PRODUCT_GATEWAY_ prefix)
        figment = figment.merge(Env::prefixed("PRODUCT_GATEWAY_").split("__"));

        figment.extract().map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.upstream.base_url, "https://dummyjson.com");
        assert_eq!(config.cache.default_ttl, Duration::from_secs(300));
        assert_eq!(config.cache.categories_ttl, Duration::from_secs(600));
        assert_eq!(config.cors.allowed_origins.len(), 3);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/gateway.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.yaml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
server:
  port: 8080
upstream:
  base_url: "http://localhost:9000"
cache:
  default_ttl: 2m
  categories_ttl: 10m
"#
        )
        .unwrap();
        drop(f);

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1"); // section default fills in
        assert_eq!(config.upstream.base_url, "http://localhost:9000");
        assert_eq!(config.cache.default_ttl, Duration::from_secs(120));
        assert_eq!(config.cache.categories_ttl, Duration::from_secs(600));
    }

    #[test]
    fn test_durations_deserialized_from_yaml() {
        let yaml = r#"
default_ttl: 5m
categories_ttl: 600s
"#;
        let cache: CacheConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cache.default_ttl, Duration::from_secs(300));
        assert_eq!(cache.categories_ttl, Duration::from_secs(600));
    }
}
