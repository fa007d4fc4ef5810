// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// A unified StorageBackend that works with either PostgreSQL (production)
// or the in-memory maps (dev mode and tests).

use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

use super::memory::InMemoryDatabase;
use super::models::*;
use super::postgres::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a PostgreSQL storage backend from a database URL and apply
    /// pending migrations.
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        db.migrate().await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        match self {
            Self::Postgres(db) => db.create_user(input).await,
            Self::InMemory(db) => db.create_user(input).await,
        }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user(id).await,
            Self::InMemory(db) => db.get_user(id).await,
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user_by_email(email).await,
            Self::InMemory(db) => db.get_user_by_email(email).await,
        }
    }

    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<UserRow>> {
        match self {
            Self::Postgres(db) => db.list_users(limit, offset).await,
            Self::InMemory(db) => db.list_users(limit, offset).await,
        }
    }

    pub async fn count_users(&self) -> Result<i64> {
        match self {
            Self::Postgres(db) => db.count_users().await,
            Self::InMemory(db) => db.count_users().await,
        }
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.update_user(id, input).await,
            Self::InMemory(db) => db.update_user(id, input).await,
        }
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_user(id).await,
            Self::InMemory(db) => db.delete_user(id).await,
        }
    }

    // ============================================
    // Events (compound lifecycle operations)
    // ============================================

    pub async fn create_event_with_reminder(
        &self,
        event: CreateEventRow,
        reminder: CreateReminderRow,
    ) -> Result<EventUserRow> {
        match self {
            Self::Postgres(db) => db.create_event_with_reminder(event, reminder).await,
            Self::InMemory(db) => db.create_event_with_reminder(event, reminder).await,
        }
    }

    pub async fn update_event_with_reminder(
        &self,
        id: Uuid,
        event: UpdateEvent,
        reminder: CreateReminderRow,
    ) -> Result<Option<EventUserRow>> {
        match self {
            Self::Postgres(db) => db.update_event_with_reminder(id, event, reminder).await,
            Self::InMemory(db) => db.update_event_with_reminder(id, event, reminder).await,
        }
    }

    pub async fn delete_event_cascade(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_event_cascade(id).await,
            Self::InMemory(db) => db.delete_event_cascade(id).await,
        }
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        match self {
            Self::Postgres(db) => db.get_event(id).await,
            Self::InMemory(db) => db.get_event(id).await,
        }
    }

    pub async fn get_event_with_user(&self, id: Uuid) -> Result<Option<EventUserRow>> {
        match self {
            Self::Postgres(db) => db.get_event_with_user(id).await,
            Self::InMemory(db) => db.get_event_with_user(id).await,
        }
    }

    pub async fn list_events_with_user(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EventUserRow>> {
        match self {
            Self::Postgres(db) => db.list_events_with_user(limit, offset).await,
            Self::InMemory(db) => db.list_events_with_user(limit, offset).await,
        }
    }

    pub async fn count_events(&self) -> Result<i64> {
        match self {
            Self::Postgres(db) => db.count_events().await,
            Self::InMemory(db) => db.count_events().await,
        }
    }

    // ============================================
    // Reminders (direct surface)
    // ============================================

    pub async fn create_reminder(&self, input: CreateReminderRow) -> Result<ReminderRow> {
        match self {
            Self::Postgres(db) => db.create_reminder(input).await,
            Self::InMemory(db) => db.create_reminder(input).await,
        }
    }

    pub async fn get_reminder_with_user(&self, id: i64) -> Result<Option<ReminderUserRow>> {
        match self {
            Self::Postgres(db) => db.get_reminder_with_user(id).await,
            Self::InMemory(db) => db.get_reminder_with_user(id).await,
        }
    }

    pub async fn get_reminder_with_user_by_event(
        &self,
        event_id: Uuid,
    ) -> Result<Option<ReminderUserRow>> {
        match self {
            Self::Postgres(db) => db.get_reminder_with_user_by_event(event_id).await,
            Self::InMemory(db) => db.get_reminder_with_user_by_event(event_id).await,
        }
    }

    pub async fn list_reminders_with_user(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReminderUserRow>> {
        match self {
            Self::Postgres(db) => db.list_reminders_with_user(limit, offset).await,
            Self::InMemory(db) => db.list_reminders_with_user(limit, offset).await,
        }
    }

    pub async fn count_reminders(&self) -> Result<i64> {
        match self {
            Self::Postgres(db) => db.count_reminders().await,
            Self::InMemory(db) => db.count_reminders().await,
        }
    }

    pub async fn update_reminder(
        &self,
        id: i64,
        input: UpdateReminder,
    ) -> Result<Option<ReminderRow>> {
        match self {
            Self::Postgres(db) => db.update_reminder(id, input).await,
            Self::InMemory(db) => db.update_reminder(id, input).await,
        }
    }

    pub async fn delete_reminder(&self, id: i64) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_reminder(id).await,
            Self::InMemory(db) => db.delete_reminder(id).await,
        }
    }
}
