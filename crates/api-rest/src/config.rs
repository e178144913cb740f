//! API configuration.

use gala_common::{AppConfig, ServerConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server host to bind to
    pub host: String,

    /// Server port to bind to
    pub port: u16,

    /// Public base URL used to build page links
    pub base_url: String,

    /// CORS allowed origins
    pub cors_allowed_origins: Vec<String>,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Enable OpenAPI documentation
    pub enable_swagger: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for ApiConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            host: server.host.clone(),
            port: server.port,
            base_url: server.base_url.clone(),
            cors_allowed_origins: server.cors_allowed_origins.clone(),
            request_timeout_seconds: server.request_timeout_seconds,
            enable_swagger: server.enable_swagger,
        }
    }
}

impl From<&AppConfig> for ApiConfig {
    fn from(config: &AppConfig) -> Self {
        Self::from(&config.server)
    }
}

impl ApiConfig {
    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Whether any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|origin| origin == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.base_url, "http://localhost:5000");
        assert!(config.enable_swagger);
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_request_timeout() {
        let config = ApiConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
