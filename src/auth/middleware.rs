// Authentication extractors
//
// Handlers take an AuthUser (401 without a valid Bearer token) or an
// AdminUser (additionally 403 without the admin role) as an argument;
// there is no route-level middleware to keep in sync with the routes.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;
use uuid::Uuid;

use super::jwt::JwtService;
use super::ROLE_ADMIN;
use crate::services::ServiceError;

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub jwt_service: Arc<JwtService>,
}

impl AuthState {
    pub fn new(jwt_service: Arc<JwtService>) -> Self {
        Self { jwt_service }
    }
}

/// Helper trait for extracting AuthState from application state
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AuthState> for AuthState {
    fn from_ref(input: &AuthState) -> Self {
        input.clone()
    }
}

/// Authenticated user context extracted from the session token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}

/// Extractor for authenticated user
/// This is required - returns 401 if not authenticated
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        extract_auth_user(parts, &auth_state)
    }
}

fn extract_auth_user(parts: &mut Parts, auth_state: &AuthState) -> Result<AuthUser, ServiceError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ServiceError::unauthorized("You need to be signed in"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ServiceError::unauthorized("Invalid authorization header"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| ServiceError::unauthorized("Invalid authorization header"))?;

    let claims = auth_state.jwt_service.validate_token(token).map_err(|e| {
        tracing::debug!("JWT validation failed: {}", e);
        ServiceError::unauthorized("Invalid authentication token")
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ServiceError::unauthorized("Invalid user ID in token"))?;

    Ok(AuthUser {
        id: user_id,
        roles: claims.roles,
    })
}

/// Require admin role extractor
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(ServiceError::forbidden(
                "You are not allowed to view this part of the application",
            ));
        }

        Ok(AdminUser(user))
    }
}
