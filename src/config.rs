// src/config.rs

use std::{env, fmt, str::FromStr};

use dotenvy::dotenv;

/// Lifetime of an issued session token (24 hours).
pub const TOKEN_TTL_SECONDS: u64 = 24 * 60 * 60;

/// Number of summary rows returned by `GET /user/resumen`.
pub const SUMMARY_HISTORY_LIMIT: i64 = 10;

/// Number of attempts returned by `GET /admin/historial`.
pub const ADMIN_HISTORY_LIMIT: i64 = 50;

/// Request timeout for the external trivia API, in seconds.
pub const TRIVIA_TIMEOUT_SECS: u64 = 10;

/// How a submitted batch updates the per-user attempt summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryMode {
    /// The stored counts are replaced by the latest batch's tally.
    #[default]
    Overwrite,
    /// The latest batch's tally is added to the stored counts.
    Accumulate,
}

impl FromStr for SummaryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(SummaryMode::Overwrite),
            "accumulate" => Ok(SummaryMode::Accumulate),
            other => Err(ConfigError::Invalid("SUMMARY_MODE", other.to_string())),
        }
    }
}

/// Error raised while reading the process environment.
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid(key, value) => write!(f, "{} has an invalid value: '{}'", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    pub cors_origin: String,
    pub trivia_api_url: String,
    pub trivia_batch_size: u32,
    pub summary_mode: SummaryMode,
    pub admin_email: Option<String>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let port = parsed("PORT", 8080)?;
        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let trivia_api_url = env::var("TRIVIA_API_URL")
            .unwrap_or_else(|_| "https://opentdb.com/api.php".to_string());
        let trivia_batch_size = parsed("TRIVIA_BATCH_SIZE", 10)?;
        let summary_mode = parsed("SUMMARY_MODE", SummaryMode::default())?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration: TOKEN_TTL_SECONDS,
            rust_log,
            port,
            cors_origin,
            trivia_api_url,
            trivia_batch_size,
            summary_mode,
            admin_email: optional("ADMIN_EMAIL"),
            admin_username: optional("ADMIN_USERNAME"),
            admin_password: optional("ADMIN_PASSWORD"),
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        Some(raw) => {
            let value = raw.trim().parse::<T>();
            value.map_err(|_| ConfigError::Invalid(key, raw))
        }
        None => Ok(default),
    }
}
