// Authentication: JWT issuing/validation and request extractors

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::{AuthConfig, JwtConfig};
pub use jwt::JwtService;
pub use middleware::{AdminUser, AuthState, AuthUser, FromRef};

/// Role granted to every registered account.
pub const ROLE_USER: &str = "user";
/// Role required for user administration endpoints.
pub const ROLE_ADMIN: &str = "admin";
