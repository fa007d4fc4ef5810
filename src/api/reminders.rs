// Reminder HTTP routes
//
// Lookup goes through the owning event (GET /reminders/{eventId}) since
// the lifecycle keeps one reminder per event; replacement and removal
// address the reminder's own numeric id. Both shapes share the
// `/reminders/:id` route, so the handlers parse the segment themselves.

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

use super::common::{PageQuery, PageResponse, ReminderWithUser};
use crate::auth::{AuthState, AuthUser, FromRef};
use crate::config::PaginationConfig;
use crate::services::{
    CreateReminderInput, ReminderService, ServiceError, UpdateReminderInput,
};
use crate::storage::StorageBackend;

/// Request body for creating or replacing a reminder.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderBody {
    pub event_id: Uuid,
    pub description: String,
    pub date: DateTime<Utc>,
}

// ============================================
// App State and Routes
// ============================================

/// App state for reminder routes
#[derive(Clone)]
pub struct AppState {
    pub reminder_service: Arc<ReminderService>,
    pub auth: AuthState,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(db: StorageBackend, auth: AuthState, pagination: PaginationConfig) -> Self {
        Self {
            reminder_service: Arc::new(ReminderService::new(db)),
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
        .route("/reminders", get(list_reminders).post(create_reminder))
        .route(
            "/reminders/:id",
            get(get_reminder_by_event)
                .put(update_reminder)
                .delete(delete_reminder),
        )
        .with_state(state)
}

// ============================================
// HTTP Handlers
// ============================================

/// GET /reminders - List reminders ordered by id
#[utoipa::path(
    get,
    path = "/reminders",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of reminders", body = PageResponse<ReminderWithUser>),
        (status = 400, description = "Invalid pagination window"),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer" = [])),
    tag = "reminders"
)]
pub async fn list_reminders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<ReminderWithUser>>, ServiceError> {
    let (limit, offset) = query.resolve(state.pagination)?;
    let (rows, count) = state.reminder_service.get_all(limit, offset).await?;
    let data = rows.into_iter().map(ReminderWithUser::from).collect();
    Ok(Json(PageResponse::new(data, count, limit, offset)))
}

/// GET /reminders/{eventId} - Fetch the reminder belonging to an event
#[utoipa::path(
    get,
    path = "/reminders/{eventId}",
    params(("eventId" = Uuid, Path, description = "Event ID the reminder belongs to")),
    responses(
        (status = 200, description = "The reminder", body = ReminderWithUser),
        (status = 400, description = "Malformed event id"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "No reminder for this event")
    ),
    security(("bearer" = [])),
    tag = "reminders"
)]
pub async fn get_reminder_by_event(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ReminderWithUser>, ServiceError> {
    let event_id: Uuid = id
        .parse()
        .map_err(|_| ServiceError::validation("eventId must be a valid UUID"))?;
    let row = state.reminder_service.get_by_event_id(event_id).await?;
    Ok(Json(ReminderWithUser::from(row)))
}

/// POST /reminders - Create a standalone reminder
#[utoipa::path(
    post,
    path = "/reminders",
    request_body = ReminderBody,
    responses(
        (status = 201, description = "Reminder created", body = ReminderWithUser),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Referenced event does not exist")
    ),
    security(("bearer" = [])),
    tag = "reminders"
)]
pub async fn create_reminder(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<ReminderBody>,
) -> Result<(StatusCode, Json<ReminderWithUser>), ServiceError> {
    let row = state
        .reminder_service
        .create(CreateReminderInput {
            event_id: body.event_id,
            description: body.description,
            date: body.date,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ReminderWithUser::from(row))))
}

/// PUT /reminders/{id} - Replace a reminder
#[utoipa::path(
    put,
    path = "/reminders/{id}",
    params(("id" = i64, Path, description = "Reminder ID")),
    request_body = ReminderBody,
    responses(
        (status = 200, description = "Reminder replaced", body = ReminderWithUser),
        (status = 400, description = "Invalid body or id"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Reminder or referenced event not found")
    ),
    security(("bearer" = [])),
    tag = "reminders"
)]
pub async fn update_reminder(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<ReminderBody>,
) -> Result<Json<ReminderWithUser>, ServiceError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ServiceError::validation("id must be an integer"))?;
    let row = state
        .reminder_service
        .update_by_id(
            id,
            UpdateReminderInput {
                event_id: body.event_id,
                description: body.description,
                date: body.date,
            },
        )
        .await?;
    Ok(Json(ReminderWithUser::from(row)))
}

/// DELETE /reminders/{id} - Delete a reminder
#[utoipa::path(
    delete,
    path = "/reminders/{id}",
    params(("id" = i64, Path, description = "Reminder ID")),
    responses(
        (status = 204, description = "Reminder deleted"),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "Reminder not found")
    ),
    security(("bearer" = [])),
    tag = "reminders"
)]
pub async fn delete_reminder(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ServiceError::validation("id must be an integer"))?;
    state.reminder_service.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
