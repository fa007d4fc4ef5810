// Event HTTP routes
//
// Every route requires a signed-in user. Creating or replacing an event
// also creates or replaces the derived reminder, which is why there is no
// partial update here: PUT carries the full event body.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{EventWithUser, PageQuery, PageResponse};
use crate::auth::{AuthState, AuthUser, FromRef};
use crate::config::PaginationConfig;
use crate::services::{CreateEventInput, EventService, ServiceError, UpdateEventInput};
use crate::storage::StorageBackend;

/// Request body for creating or replacing an event. The owning user
/// defaults to the session user when omitted.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    pub user_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: String,
}

// ============================================
// App State and Routes
// ============================================

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub event_service: Arc<EventService>,
    pub auth: AuthState,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(db: StorageBackend, auth: AuthState, pagination: PaginationConfig) -> Self {
        Self {
            event_service: Arc::new(EventService::new(db)),
            auth,
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
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .with_state(state)
}

// ============================================
// HTTP Handlers
// ============================================

/// GET /events - List events ordered by date
#[utoipa::path(
    get,
    path = "/events",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of events", body = PageResponse<EventWithUser>),
        (status = 400, description = "Invalid pagination window"),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer" = [])),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<EventWithUser>>, ServiceError> {
    let (limit, offset) = query.resolve(state.pagination)?;
    let (rows, count) = state.event_service.get_all(limit, offset).await?;
    let data = rows.into_iter().map(EventWithUser::from).collect();
    Ok(Json(PageResponse::new(data, count, limit, offset)))
}

/// GET /events/{id} - Fetch a single event
#[utoipa::path(
    get,
    path = "/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "The event", body = EventWithUser),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer" = [])),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventWithUser>, ServiceError> {
    let row = state.event_service.get_by_id(id).await?;
    Ok(Json(EventWithUser::from(row)))
}

/// POST /events - Create an event (and its derived reminder)
#[utoipa::path(
    post,
    path = "/events",
    request_body = EventBody,
    responses(
        (status = 201, description = "Event created", body = EventWithUser),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer" = [])),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<EventBody>,
) -> Result<(StatusCode, Json<EventWithUser>), ServiceError> {
    let row = state
        .event_service
        .create(CreateEventInput {
            user_id: body.user_id.unwrap_or(user.id),
            title: body.title,
            description: body.description,
            date: body.date,
            event_type: body.event_type,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(EventWithUser::from(row))))
}

/// PUT /events/{id} - Replace an event (recreates the derived reminder)
#[utoipa::path(
    put,
    path = "/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = EventBody,
    responses(
        (status = 200, description = "Event replaced", body = EventWithUser),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer" = [])),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<EventBody>,
) -> Result<Json<EventWithUser>, ServiceError> {
    let row = state
        .event_service
        .update_by_id(
            id,
            UpdateEventInput {
                user_id: body.user_id.unwrap_or(user.id),
                title: body.title,
                description: body.description,
                date: body.date,
                event_type: body.event_type,
            },
        )
        .await?;
    Ok(Json(EventWithUser::from(row)))
}

/// DELETE /events/{id} - Delete an event and its reminders
#[utoipa::path(
    delete,
    path = "/events/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer" = [])),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.event_service.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
