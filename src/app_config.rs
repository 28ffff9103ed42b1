// Centralized configuration management for HirePath Backend
// All env vars are loaded ONCE at startup into a static config

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Global application configuration loaded once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    // For tests, load .env file first
    #[cfg(test)]
    dotenv::dotenv().ok();

    AppConfig::from_env().expect("Failed to load configuration")
});

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    // Server
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
    pub rust_log: String,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connect_timeout: u64,
    pub database_idle_timeout: u64,
    pub database_max_lifetime: u64,

    // JWT (token issuance lives in the identity service; we only validate)
    pub jwt_access_secret: String,
    pub jwt_audience: String,
    pub jwt_issuer: String,

    // Application URLs
    pub dashboard_url: String,

    // CORS
    pub cors_allowed_origins: Vec<String>,

    // Features
    pub enable_swagger_ui: bool,
    pub disable_embedded_migrations: bool,

    // Nested configs
    pub server: ServerConfig,
    pub email: EmailConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
    pub rust_log: String,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Email configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub api_key: String,
    pub api_url: String,
    pub from_email: String,
    pub from_name: String,
    pub dashboard_url: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let get_required = |key: &str| -> Result<String, ConfigError> {
            env::var(key).map_err(|_| ConfigError::MissingVar(key.to_string()))
        };

        let get_or_default = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let parse_or_default = |key: &str, default: &str| -> Result<u32, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u32".to_string())
            })
        };

        let parse_u64_or_default = |key: &str, default: &str| -> Result<u64, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
            })
        };

        let parse_bool_or_default = |key: &str, default: &str| -> bool {
            get_or_default(key, default).to_lowercase() == "true"
        };

        // Parse bind address to extract port
        let bind_address = get_or_default("BIND_ADDRESS", "0.0.0.0:8080");
        let port = bind_address
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let dashboard_url = get_or_default("DASHBOARD_URL", "http://localhost:3000");

        // JWT secret validation
        let jwt_access_secret = get_required("JWT_ACCESS_SECRET")?;
        if jwt_access_secret.len() < 32 {
            return Err(ConfigError::InvalidValue(
                "JWT_ACCESS_SECRET".to_string(),
                "Secret must be at least 32 characters long".to_string(),
            ));
        }

        let environment_str = get_or_default("ENVIRONMENT", "development");
        let environment = Environment::from(environment_str);

        let database_url = get_required("DATABASE_URL")?;
        let database_max_connections = parse_or_default("DATABASE_MAX_CONNECTIONS", "100")?;
        let database_min_connections = parse_or_default("DATABASE_MIN_CONNECTIONS", "10")?;
        let database_connect_timeout = parse_u64_or_default("DATABASE_CONNECT_TIMEOUT", "30")?;
        let database_idle_timeout = parse_u64_or_default("DATABASE_IDLE_TIMEOUT", "600")?;
        let database_max_lifetime = parse_u64_or_default("DATABASE_MAX_LIFETIME", "1800")?;

        let jwt_audience = get_or_default("JWT_AUDIENCE", "hirepath.io");
        let jwt_issuer = get_or_default("JWT_ISSUER", "hirepath.io");

        let cors_allowed_origins: Vec<String> = get_or_default("CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let enable_swagger_ui = parse_bool_or_default("ENABLE_SWAGGER_UI", "false");
        let disable_embedded_migrations =
            parse_bool_or_default("DISABLE_EMBEDDED_MIGRATIONS", "false");

        let rust_log = get_or_default("RUST_LOG", "info");

        let server = ServerConfig {
            bind_address: bind_address.clone(),
            port,
            environment: environment.clone(),
            rust_log: rust_log.clone(),
        };

        let email = EmailConfig {
            api_key: get_or_default("EMAIL_API_KEY", ""),
            api_url: get_or_default("EMAIL_API_URL", "https://api.resend.com/emails"),
            from_email: get_or_default("EMAIL_FROM_ADDRESS", "notifications@hirepath.io"),
            from_name: get_or_default("EMAIL_FROM_NAME", "HirePath"),
            dashboard_url: dashboard_url.clone(),
        };

        Ok(Self {
            bind_address,
            port,
            environment,
            rust_log,
            database_url,
            database_max_connections,
            database_min_connections,
            database_connect_timeout,
            database_idle_timeout,
            database_max_lifetime,
            jwt_access_secret,
            jwt_audience,
            jwt_issuer,
            dashboard_url,
            cors_allowed_origins,
            enable_swagger_ui,
            disable_embedded_migrations,
            server,
            email,
        })
    }
}

/// Access to the global configuration
pub fn config() -> &'static AppConfig {
    &CONFIG
}
