//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
///
/// Both database URLs are optional: with neither present the service
/// starts in a degraded mode where every store operation reports
/// "database not configured" instead of crashing. `database_admin_url`
/// is the elevated-privilege credential (bypasses row-level policy),
/// used exclusively for server-side writes and admin reads;
/// `database_url` is the restricted credential used for public reads.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: Option<String>,
    pub database_admin_url: Option<String>,
    pub webhook_url: Option<String>,
    pub admin_api_token: Option<String>,
    pub cors_origin: String,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Store Credentials (both optional) ---
        let database_url = std::env::var("DATABASE_URL").ok();
        let database_admin_url = std::env::var("DATABASE_ADMIN_URL").ok();

        // --- Load Notification and Site Settings ---
        let webhook_url = std::env::var("WEBHOOK_URL").ok();
        let admin_api_token = std::env::var("ADMIN_API_TOKEN").ok();

        let cors_origin =
            std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            bind_address,
            database_url,
            database_admin_url,
            webhook_url,
            admin_api_token,
            cors_origin,
            log_level,
        })
    }

    /// True when at least one store credential is present.
    pub fn store_configured(&self) -> bool {
        self.database_url.is_some() || self.database_admin_url.is_some()
    }
}
