// Event service: the event/reminder lifecycle manager
//
// Every event mutation is mirrored on the derived reminder so the two can
// never drift apart:
//   create  -> insert event + one templated reminder
//   update  -> replace event, delete reminders, insert one fresh reminder
//   delete  -> delete reminders, then the event
// The storage backend runs each pair as a single unit of work.

use uuid::Uuid;

use super::error::ServiceError;
use crate::storage::{
    CreateEventRow, CreateReminderRow, EventUserRow, StorageBackend, UpdateEvent,
};
use chrono::{DateTime, Utc};

/// Input for creating an event; the owning user comes from the session
/// unless the caller supplied one explicitly.
#[derive(Debug, Clone)]
pub struct CreateEventInput {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub event_type: String,
}

/// Full replacement input for updating an event.
#[derive(Debug, Clone)]
pub struct UpdateEventInput {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub event_type: String,
}

/// Description applied to the reminder derived from a fresh event.
fn reminder_description(title: &str) -> String {
    format!("{title} starts shortly")
}

pub struct EventService {
    db: StorageBackend,
}

impl EventService {
    pub fn new(db: StorageBackend) -> Self {
        Self { db }
    }

    pub async fn get_all(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<EventUserRow>, i64), ServiceError> {
        tracing::debug!(limit, offset, "fetching all events");
        let data = self
            .db
            .list_events_with_user(limit as i64, offset as i64)
            .await?;
        let count = self.db.count_events().await?;
        Ok((data, count))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<EventUserRow, ServiceError> {
        tracing::debug!(event_id = %id, "fetching event");
        self.db
            .get_event_with_user(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("There is no event with id {id}")))
    }

    pub async fn create(&self, input: CreateEventInput) -> Result<EventUserRow, ServiceError> {
        if input.title.trim().is_empty() {
            return Err(ServiceError::validation("title must not be empty"));
        }
        if input.event_type.trim().is_empty() {
            return Err(ServiceError::validation("type must not be empty"));
        }

        let id = Uuid::new_v4();
        tracing::debug!(event_id = %id, user_id = %input.user_id, "creating event");

        let event = CreateEventRow {
            id,
            user_id: input.user_id,
            title: input.title.clone(),
            description: input.description,
            date: input.date,
            event_type: input.event_type,
        };
        let reminder = CreateReminderRow {
            event_id: id,
            description: reminder_description(&input.title),
            date: input.date,
        };

        let row = self
            .db
            .create_event_with_reminder(event, reminder)
            .await
            .map_err(|e| {
                tracing::error!(event_id = %id, "failed to create event: {:#}", e);
                ServiceError::from(e)
            })?;
        Ok(row)
    }

    pub async fn update_by_id(
        &self,
        id: Uuid,
        input: UpdateEventInput,
    ) -> Result<EventUserRow, ServiceError> {
        if input.title.trim().is_empty() {
            return Err(ServiceError::validation("title must not be empty"));
        }
        if input.event_type.trim().is_empty() {
            return Err(ServiceError::validation("type must not be empty"));
        }

        tracing::debug!(event_id = %id, "updating event");

        // The recreated reminder carries the updated description and date,
        // never the pre-update values
        let reminder = CreateReminderRow {
            event_id: id,
            description: input.description.clone(),
            date: input.date,
        };
        let event = UpdateEvent {
            user_id: input.user_id,
            title: input.title,
            description: input.description,
            date: input.date,
            event_type: input.event_type,
        };

        self.db
            .update_event_with_reminder(id, event, reminder)
            .await
            .map_err(|e| {
                tracing::error!(event_id = %id, "failed to update event: {:#}", e);
                ServiceError::from(e)
            })?
            .ok_or_else(|| ServiceError::not_found(format!("There is no event with id {id}")))
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<(), ServiceError> {
        tracing::debug!(event_id = %id, "deleting event");
        let existed = self.db.delete_event_cascade(id).await.map_err(|e| {
            tracing::error!(event_id = %id, "failed to delete event: {:#}", e);
            ServiceError::from(e)
        })?;
        if !existed {
            return Err(ServiceError::not_found(format!(
                "There is no event with id {id}"
            )));
        }
        Ok(())
    }
}
