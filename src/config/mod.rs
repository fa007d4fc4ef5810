// Application configuration loaded from environment variables.
// Decision: Everything configurable carries a sensible local-dev default

use crate::auth::config::AuthConfig;

/// Pagination defaults applied when a request supplies neither limit nor
/// offset.
#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
        }
    }
}

impl PaginationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            limit: env_parse("PAGINATION_LIMIT", defaults.limit),
            offset: env_parse("PAGINATION_OFFSET", defaults.offset),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub port: u16,
    /// Prefix applied to all API routes (health included)
    pub api_prefix: String,
    /// Allowed CORS origins; empty means same-origin only
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 9000,
            api_prefix: "/api".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let cors_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or_default();

        Self {
            port: env_parse("PORT", defaults.port),
            api_prefix: std::env::var("API_PREFIX").unwrap_or(defaults.api_prefix),
            cors_origins,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Environment name reported by /health/version ("development",
    /// "production", ...)
    pub environment: String,
    pub http: HttpConfig,
    /// When unset the server runs on the in-memory backend (dev mode)
    pub database_url: Option<String>,
    pub pagination: PaginationConfig,
    pub auth: AuthConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            http: HttpConfig::default(),
            database_url: None,
            pagination: PaginationConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            http: HttpConfig::from_env(),
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            pagination: PaginationConfig::from_env(),
            auth: AuthConfig::from_env(),
        }
    }
}

fn env_parse<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
