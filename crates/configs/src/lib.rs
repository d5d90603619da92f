//! # configs
//!
//! Layered application configuration: compiled defaults, then an optional
//! `inkpress.toml`, then `INKPRESS__*` environment variables (loaded from a
//! `.env` file when present). Connection strings and signing secrets are
//! wrapped in [`secrecy::SecretString`] so they never end up in debug
//! output or logs.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string; required, no default.
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for session tokens; required, no default.
    pub jwt_secret: SecretString,
    pub token_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. "info,sqlx=warn".
    pub filter: String,
    pub json: bool,
}

impl AppConfig {
    /// Missing required keys (database url, jwt secret) fail here, at
    /// startup, rather than at first use.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("database.max_connections", 10_i64)?
            .set_default("auth.token_ttl_minutes", 60_i64 * 24)?
            .set_default("logging.filter", "info")?
            .set_default("logging.json", false)?
            .add_source(File::with_name("inkpress").required(false))
            .add_source(Environment::with_prefix("INKPRESS").separator("__"))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        tracing::debug!(host = %config.server.host, port = config.server.port, "configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_overrides_defaults() {
        std::env::set_var("INKPRESS__DATABASE__URL", "postgres://localhost/inkpress_test");
        std::env::set_var("INKPRESS__AUTH__JWT_SECRET", "not-for-production");
        std::env::set_var("INKPRESS__SERVER__PORT", "9090");

        let config = AppConfig::load().unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.max_connections, 10);
    }
}
