//! Configuration management for the application.
//!
//! Settings are layered with the `config` crate: built-in defaults, then
//! `config/default.*`, then `config/{APP_ENV}.*`, then `APP_`-prefixed
//! environment variables using `__` as the section separator.
//!
//! ## Example Configuration
//!
//! ```toml
//! [server]
//! port = 5000
//! base_url = "http://localhost:5000"
//!
//! [store]
//! provider = "dynamodb"
//! local_mode = true
//! local_service_url = "http://localhost:8000"
//!
//! [telemetry]
//! json_logging = true
//! ```

use crate::retry::RetryConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Public base URL used to build page links
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// CORS allowed origins ("*" for any)
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Serve the Swagger UI
    #[serde(default = "default_enable_swagger")]
    pub enable_swagger: bool,
}

/// Which document store backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreProvider {
    /// Process-local store, lost on restart
    #[default]
    Memory,
    /// Amazon DynamoDB or DynamoDB Local
    #[serde(alias = "dynamo_db")]
    Dynamodb,
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store implementation
    #[serde(default)]
    pub provider: StoreProvider,

    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,

    /// Talk to a local DynamoDB endpoint instead of AWS
    #[serde(default)]
    pub local_mode: bool,

    /// Endpoint used in local mode
    #[serde(default = "default_local_service_url")]
    pub local_service_url: String,

    /// Prefix prepended to every table name
    #[serde(default)]
    pub table_prefix: String,

    /// Retries for work the store reports as unprocessed
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl StoreConfig {
    /// Backoff applied between resends of unprocessed work
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::exponential(self.max_retries).with_max_delay(Duration::from_secs(5))
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable JSON logging format
    #[serde(default)]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_enable_swagger() -> bool {
    true
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_local_service_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_max_retries() -> u32 {
    5
}

fn default_service_name() -> String {
    "gala-catalog".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
            cors_allowed_origins: default_cors_origins(),
            enable_swagger: default_enable_swagger(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: StoreProvider::default(),
            region: default_region(),
            local_mode: false,
            local_service_url: default_local_service_url(),
            table_prefix: String::new(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            json_logging: false,
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the `config` directory and the environment.
    ///
    /// The configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/{environment}.toml (if exists, where environment is from APP_ENV)
    /// 4. Environment variables (prefixed with APP_)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config"))
    }

    /// Same as [`AppConfig::load`], reading files from `dir`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(
                config::File::with_name(&dir.join("default").to_string_lossy()).required(false),
            )
            .add_source(config::File::with_name(&dir.join(&env).to_string_lossy()).required(false))
            // Example: APP_SERVER__PORT=3000
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_allowed_origins")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.server.request_timeout_seconds == 0 {
            anyhow::bail!("Request timeout must be greater than 0");
        }

        if url::Url::parse(&self.server.base_url).is_err() {
            anyhow::bail!("Server base URL '{}' is not an absolute URL", self.server.base_url);
        }

        if self.store.provider == StoreProvider::Dynamodb {
            if self.store.region.is_empty() {
                anyhow::bail!("Store region is required");
            }

            if self.store.local_mode && url::Url::parse(&self.store.local_service_url).is_err() {
                anyhow::bail!(
                    "Local service URL '{}' is not an absolute URL",
                    self.store.local_service_url
                );
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }

    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_seconds)
    }

    /// Address the server binds to
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Create a development configuration with sensible defaults
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                ..ServerConfig::default()
            },
            store: StoreConfig::default(),
            telemetry: TelemetryConfig {
                log_level: "debug".to_string(),
                ..TelemetryConfig::default()
            },
        }
    }
}
