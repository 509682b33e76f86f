use anyhow::{Context, Result};

/// Connection settings for the document store.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// `ws://host:port`, `wss://...`, or `mem://` for an in-process store.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl DocumentConfig {
    pub fn from_env() -> Result<Self> {
        Ok(DocumentConfig {
            url: require_env("DOCUMENT_URL")?,
            namespace: env_or("DOCUMENT_NAMESPACE", "hotel_booking"),
            database: env_or("DOCUMENT_DATABASE", "hotel_booking_db"),
            username: std::env::var("DOCUMENT_USER").ok(),
            password: std::env::var("DOCUMENT_PASSWORD").ok(),
        })
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub document: DocumentConfig,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", "10")
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            document: DocumentConfig::from_env()?,
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
