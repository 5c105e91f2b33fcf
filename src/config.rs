use std::env;
use std::fmt;

/// Token lifetime used when `ACCESS_TOKEN_TTL_MINUTES` is not set.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 50;

/// Runtime configuration, read once from the environment in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// MongoDB connection string, or `memory://` for the in-process store
    pub database_url: String,
    pub token_secret: String,
    pub token_ttl_minutes: i64,
    /// Include `stackTrace` and unredacted internal causes in error bodies
    pub expose_error_details: bool,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: {}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => 5000,
        };

        let database_url = lookup("DATABASE_URL")
            .or_else(|| lookup("CONNECTION_STRING"))
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let token_secret = lookup("ACCESS_TOKEN_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;

        let token_ttl_minutes = match lookup("ACCESS_TOKEN_TTL_MINUTES") {
            Some(value) => match value.parse::<i64>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "ACCESS_TOKEN_TTL_MINUTES",
                        value,
                    })
                }
            },
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };

        let expose_error_details = match lookup("EXPOSE_ERROR_DETAILS") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                key: "EXPOSE_ERROR_DETAILS",
                value,
            })?,
            None => false,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            database_url,
            token_secret,
            token_ttl_minutes,
            expose_error_details,
            cors_allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory://")
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
