//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Custody desk client configuration.
    pub custody: CustodyConfig,
    /// Webhook signature configuration.
    pub webhooks: WebhookConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Custody desk client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CustodyConfig {
    /// Base URL of the custody desk API.
    pub base_url: String,
    /// API key for authenticated requests.
    pub api_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_custody_timeout")]
    pub timeout_secs: u64,
}

fn default_custody_timeout() -> u64 {
    10
}

/// Webhook signature configuration.
///
/// Each provider signs its payloads with a separate shared secret.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret for custody desk webhook signatures.
    pub custody_secret: String,
    /// Shared secret for fiat processor webhook signatures.
    pub processor_secret: String,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KOBO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
