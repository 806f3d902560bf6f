//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Payment gateway configuration.
    pub payment: PaymentConfig,
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

/// Payment gateway configuration.
///
/// The key secret is the shared secret used to verify payment signatures.
/// Top-up orders below `min_topup_minor` minor units are rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Public key identifier issued by the gateway.
    pub key_id: String,
    /// Shared secret used for HMAC signature verification.
    pub key_secret: String,
    /// ISO 4217 currency code for gateway orders.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Minimum top-up amount in minor currency units.
    #[serde(default = "default_min_topup")]
    pub min_topup_minor: i64,
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_min_topup() -> i64 {
    100
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
            .add_source(config::Environment::with_prefix("PAISA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
