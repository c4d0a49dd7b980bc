/// Configuration management for the retail API
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Minimum accepted length of the token signing secret
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub authentication: AuthConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    pub max_connections: u32,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Process-wide token signing secret
    pub jwt_secret: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Parse a numeric setting, falling back to `default` only when unset
fn parse_setting<T: FromStr>(name: &str, raw: Option<String>, default: T) -> AppResult<T> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid value for {}: {:?}", name, value))),
        None => Ok(default),
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("APP_HOSTNAME").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_setting("APP_PORT", env::var("APP_PORT").ok(), 8080)?;
        let cors_origins = env::var("APP_CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8081".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_path = env::var("APP_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/retail.sqlite"));
        let max_connections = parse_setting(
            "APP_DB_MAX_CONNECTIONS",
            env::var("APP_DB_MAX_CONNECTIONS").ok(),
            5,
        )?;

        let jwt_secret = env::var("APP_JWT_SECRET")
            .map_err(|_| AppError::Config("APP_JWT_SECRET is required".to_string()))?;

        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let format = match env::var("APP_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                cors_origins,
            },
            storage: StorageConfig {
                database_path,
                max_connections,
            },
            authentication: AuthConfig { jwt_secret },
            logging: LoggingConfig { level, format },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.service.hostname.is_empty() {
            return Err(AppError::Config("Hostname cannot be empty".to_string()));
        }

        if self.storage.max_connections == 0 {
            return Err(AppError::Config(
                "Database pool needs at least one connection".to_string(),
            ));
        }

        if self.authentication.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT secret must be at least {} characters",
                MIN_JWT_SECRET_LEN
            )));
        }

        Ok(())
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.hostname, self.service.port)
    }
}
