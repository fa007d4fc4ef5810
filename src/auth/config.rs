// Authentication configuration
// Decision: HS256 with a shared secret; the secret must come from the
// environment outside local development.

/// JWT signing and validation settings
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds
    pub expiration_secs: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "development-only-jwt-secret-change-me".to_string(),
            expiration_secs: 3600,
            issuer: "calendar-api".to_string(),
            audience: "calendar-api".to_string(),
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("AUTH_JWT_SECRET").unwrap_or(defaults.secret),
            expiration_secs: std::env::var("AUTH_JWT_EXPIRATION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.expiration_secs),
            issuer: std::env::var("AUTH_JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("AUTH_JWT_AUDIENCE").unwrap_or(defaults.audience),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
        }
    }
}
