// Row types for the storage layer
//
// Plain structs mapped 1:1 onto table columns, plus the joined projections
// the listing queries return. Roles are stored as a JSON array so the set
// can grow without a schema change.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// Users
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Decode the JSON role set; unknown shapes degrade to an empty set.
    pub fn role_set(&self) -> Vec<String> {
        serde_json::from_value(self.roles.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

/// Partial user update; None leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

// ============================================
// Events
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub event_type: String,
}

#[derive(Debug, Clone)]
pub struct CreateEventRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub event_type: String,
}

/// Full-row event update (PUT semantics: every field is replaced).
#[derive(Debug, Clone)]
pub struct UpdateEvent {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub event_type: String,
}

// ============================================
// Reminders
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct ReminderRow {
    pub id: i64,
    pub event_id: Uuid,
    pub description: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateReminderRow {
    pub event_id: Uuid,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Full-row reminder update (PUT semantics).
#[derive(Debug, Clone)]
pub struct UpdateReminder {
    pub event_id: Uuid,
    pub description: String,
    pub date: DateTime<Utc>,
}

// ============================================
// Joined projections
// ============================================

/// Event row joined with its owning user's public columns.
#[derive(Debug, Clone, FromRow)]
pub struct EventUserRow {
    pub event_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub event_type: String,
    pub user_id: Uuid,
    pub user_name: String,
}

/// Reminder row joined through its event to the owning user.
#[derive(Debug, Clone, FromRow)]
pub struct ReminderUserRow {
    pub reminder_id: i64,
    pub event_id: Uuid,
    pub description: String,
    pub date: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_name: String,
}
