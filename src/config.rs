use std::env;

use thiserror::Error;

/// Process-wide settings, loaded once at startup and passed by reference
/// through application state. No hot-reload.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_host: String,
    pub bind_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub cors_origins: Vec<String>,
    pub weather_api_key: String,
    pub weather_base_url: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidVar(&'static str, String),
}

const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

impl AppConfig {
    /// Build configuration from the environment. `JWT_SECRET` and
    /// `DATABASE_URL` are required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let bind_port = match env::var("PORT") {
            Ok(v) => v
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidVar("PORT", v))?,
            Err(_) => 8000,
        };

        let token_ttl_minutes = match env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(v) => v
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidVar("ACCESS_TOKEN_EXPIRE_MINUTES", v))?,
            Err(_) => DEFAULT_TOKEN_TTL_MINUTES,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ]
            });

        Ok(Self {
            bind_host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            bind_port,
            database_url,
            jwt_secret,
            token_ttl_minutes,
            cors_origins,
            weather_api_key: env::var("WEATHER_API_KEY").unwrap_or_default(),
            weather_base_url: env::var("WEATHER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_WEATHER_BASE_URL.to_string()),
        })
    }
}
