// Common DTOs for the public API
//
// These types are shared across multiple API endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::config::PaginationConfig;
use crate::services::ServiceError;
use crate::storage::{EventUserRow, ReminderUserRow};

/// Pagination query parameters. The two travel together: supplying only
/// one of them is a validation error.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Maximum number of items to return
    pub limit: Option<u32>,
    /// Number of items to skip
    pub offset: Option<u32>,
}

impl PageQuery {
    pub fn resolve(&self, defaults: PaginationConfig) -> Result<(u32, u32), ServiceError> {
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => {
                if limit == 0 {
                    return Err(ServiceError::validation("limit must be a positive integer"));
                }
                Ok((limit, offset))
            }
            (None, None) => Ok((defaults.limit, defaults.offset)),
            _ => Err(ServiceError::validation(
                "limit and offset must be supplied together",
            )),
        }
    }
}

/// Response wrapper for list endpoints.
/// Carries the page plus the collection total and the window that produced
/// the page, so clients can derive whether more items exist.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    /// Total number of items in the collection, not the page
    pub count: i64,
    pub limit: u32,
    pub offset: u32,
}

impl<T> PageResponse<T> {
    pub fn new(data: Vec<T>, count: i64, limit: u32, offset: u32) -> Self {
        Self {
            data,
            count,
            limit,
            offset,
        }
    }
}

/// Public columns of the owning user embedded in list items.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
}

/// Event as rendered to clients, with the owning user nested.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventWithUser {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub user: UserSummary,
}

impl From<EventUserRow> for EventWithUser {
    fn from(row: EventUserRow) -> Self {
        Self {
            id: row.event_id,
            title: row.title,
            description: row.description,
            date: row.date,
            event_type: row.event_type,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
            },
        }
    }
}

/// Reminder as rendered to clients, with the owning user nested.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderWithUser {
    pub id: i64,
    pub event_id: Uuid,
    pub description: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub user: UserSummary,
}

impl From<ReminderUserRow> for ReminderWithUser {
    fn from(row: ReminderUserRow) -> Self {
        Self {
            id: row.reminder_id,
            event_id: row.event_id,
            description: row.description,
            date: row.date,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
            },
        }
    }
}
