// User HTTP routes
//
// login/register are the only public endpoints in the whole API. Listing,
// replacing and removing accounts is admin-only; fetching a single
// account just needs a session.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{PageQuery, PageResponse};
use super::validation::{
    validate_email, validate_name, validate_password, validate_users_limit,
};
use crate::auth::{AdminUser, AuthState, AuthUser, FromRef, JwtService};
use crate::config::PaginationConfig;
use crate::services::{ExposedUser, ServiceError, SessionData, UserService};
use crate::storage::{StorageBackend, UpdateUser};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Admin-side account update; omitted fields are left untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserBody {
    pub name: Option<String>,
    pub email: Option<String>,
}

// ============================================
// App State and Routes
// ============================================

/// App state for user routes
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth: AuthState,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(
        db: StorageBackend,
        jwt_service: Arc<JwtService>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            user_service: Arc::new(UserService::new(db, jwt_service.clone())),
            auth: AuthState::new(jwt_service),
            pagination,
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(input: &AppState) -> Self {
        input.auth.clone()
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/users/login", post(login))
        .route("/users/register", post(register))
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(state)
}

// ============================================
// HTTP Handlers
// ============================================

/// POST /users/login - Exchange credentials for a session token
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Signed in", body = SessionData),
        (status = 401, description = "Credentials do not match")
    ),
    tag = "users"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<SessionData>, ServiceError> {
    let session = state.user_service.login(&body.email, &body.password).await?;
    Ok(Json(session))
}

/// POST /users/register - Create an account and sign it in
#[utoipa::path(
    post,
    path = "/users/register",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created", body = SessionData),
        (status = 400, description = "Invalid body"),
        (status = 409, description = "Email already taken")
    ),
    tag = "users"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<SessionData>), ServiceError> {
    validate_name(&body.name)?;
    validate_email(&body.email)?;
    validate_password(&body.password)?;

    let session = state
        .user_service
        .register(&body.name, &body.email, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /users - List accounts (admin only)
#[utoipa::path(
    get,
    path = "/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of users", body = PageResponse<ExposedUser>),
        (status = 400, description = "Invalid pagination window"),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<ExposedUser>>, ServiceError> {
    let (limit, offset) = query.resolve(state.pagination)?;
    validate_users_limit(limit)?;

    let (rows, count) = state.user_service.get_all(limit, offset).await?;
    let data = rows.iter().map(ExposedUser::from).collect();
    Ok(Json(PageResponse::new(data, count, limit, offset)))
}

/// GET /users/{id} - Fetch a single account
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user", body = ExposedUser),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ExposedUser>, ServiceError> {
    let row = state.user_service.get_by_id(id).await?;
    Ok(Json(ExposedUser::from(&row)))
}

/// PUT /users/{id} - Update an account (admin only)
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "User updated", body = ExposedUser),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already taken")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<ExposedUser>, ServiceError> {
    if let Some(name) = &body.name {
        validate_name(name)?;
    }
    if let Some(email) = &body.email {
        validate_email(email)?;
    }

    let row = state
        .user_service
        .update_by_id(
            id,
            UpdateUser {
                name: body.name,
                email: body.email,
            },
        )
        .await?;
    Ok(Json(ExposedUser::from(&row)))
}

/// DELETE /users/{id} - Delete an account (admin only)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.user_service.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
