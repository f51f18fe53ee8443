//! Service configuration
//!
//! Values come from built-in defaults overlaid by environment variables
//! (`SERVER_PORT`, `DATABASE_URL`, ...). `main` loads `.env` first, so a
//! dotenv file behaves like the real environment.

use std::time::Duration;

use common::database::DatabaseConfig;
use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

use crate::auth::JwtConfig;
use crate::services::SuperUserSeed;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Flat view of the environment, one field per variable
#[derive(Debug, Deserialize)]
struct RawConfig {
    server_host: String,
    server_port: u16,
    database_url: Option<String>,
    database_max_connections: u32,
    database_min_connections: u32,
    database_connection_timeout: u64,
    jwt_secret_key: Option<String>,
    jwt_expiration_hours: u64,
    request_timeout_secs: u64,
    superuser_email: Option<String>,
    superuser_password: Option<String>,
    superuser_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Fully validated service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub super_user: Option<SuperUserSeed>,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::default())
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        let raw: RawConfig = Config::builder()
            .set_default("server_host", "0.0.0.0")?
            .set_default("server_port", 8080)?
            .set_default("database_max_connections", 10)?
            .set_default("database_min_connections", 1)?
            .set_default("database_connection_timeout", 30)?
            .set_default("jwt_expiration_hours", 24)?
            .set_default("request_timeout_secs", 30)?
            // Left as strings: numeric fields still parse, secrets stay verbatim
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        raw.try_into()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<RawConfig> for AppConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let database_url =
            non_empty(raw.database_url).ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let secret = non_empty(raw.jwt_secret_key).ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?;

        if raw.jwt_expiration_hours == 0 {
            return Err(ConfigError::Invalid(
                "JWT_EXPIRATION_HOURS must be at least 1".to_string(),
            ));
        }
        if raw.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "REQUEST_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        let super_user = match (
            non_empty(raw.superuser_email),
            non_empty(raw.superuser_password),
        ) {
            (Some(email), Some(password)) => Some(SuperUserSeed {
                name: non_empty(raw.superuser_name).unwrap_or_else(|| "Super User".to_string()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(AppConfig {
            server: ServerConfig {
                host: raw.server_host,
                port: raw.server_port,
                request_timeout: Duration::from_secs(raw.request_timeout_secs),
            },
            database: DatabaseConfig {
                database_url,
                max_connections: raw.database_max_connections,
                min_connections: raw.database_min_connections,
                connection_timeout: raw.database_connection_timeout,
            },
            jwt: JwtConfig {
                secret,
                expiry_secs: raw.jwt_expiration_hours * 3600,
            },
            super_user,
        })
    }
}
