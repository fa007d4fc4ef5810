// Reminder service
//
// Reminders normally come into existence through the event lifecycle, but
// the direct surface below allows creating, replacing and removing them on
// their own. Every reminder must point at an existing event; that guard
// lives here rather than relying on the database foreign key so both
// backends behave the same.

use uuid::Uuid;

use super::error::ServiceError;
use crate::storage::{CreateReminderRow, ReminderUserRow, StorageBackend, UpdateReminder};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct CreateReminderInput {
    pub event_id: Uuid,
    pub description: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UpdateReminderInput {
    pub event_id: Uuid,
    pub description: String,
    pub date: DateTime<Utc>,
}

pub struct ReminderService {
    db: StorageBackend,
}

impl ReminderService {
    pub fn new(db: StorageBackend) -> Self {
        Self { db }
    }

    pub async fn get_all(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<ReminderUserRow>, i64), ServiceError> {
        tracing::debug!(limit, offset, "fetching all reminders");
        let data = self
            .db
            .list_reminders_with_user(limit as i64, offset as i64)
            .await?;
        let count = self.db.count_reminders().await?;
        Ok((data, count))
    }

    /// Look a reminder up by the event it belongs to. With the lifecycle
    /// maintaining one reminder per event this is the natural access path.
    pub async fn get_by_event_id(&self, event_id: Uuid) -> Result<ReminderUserRow, ServiceError> {
        tracing::debug!(event_id = %event_id, "fetching reminder for event");
        self.db
            .get_reminder_with_user_by_event(event_id)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found(format!(
                    "There is no reminder for event with id {event_id}"
                ))
            })
    }

    pub async fn create(&self, input: CreateReminderInput) -> Result<ReminderUserRow, ServiceError> {
        if input.description.trim().is_empty() {
            return Err(ServiceError::validation("description must not be empty"));
        }
        self.ensure_event_exists(input.event_id).await?;

        tracing::debug!(event_id = %input.event_id, "creating reminder");
        let row = self
            .db
            .create_reminder(CreateReminderRow {
                event_id: input.event_id,
                description: input.description,
                date: input.date,
            })
            .await
            .map_err(|e| {
                tracing::error!(event_id = %input.event_id, "failed to create reminder: {:#}", e);
                ServiceError::from(e)
            })?;

        self.db
            .get_reminder_with_user(row.id)
            .await?
            .ok_or_else(|| {
                ServiceError::from(anyhow::anyhow!(
                    "reminder {} vanished after insert",
                    row.id
                ))
            })
    }

    pub async fn update_by_id(
        &self,
        id: i64,
        input: UpdateReminderInput,
    ) -> Result<ReminderUserRow, ServiceError> {
        if input.description.trim().is_empty() {
            return Err(ServiceError::validation("description must not be empty"));
        }
        self.ensure_event_exists(input.event_id).await?;

        tracing::debug!(reminder_id = id, "updating reminder");
        let updated = self
            .db
            .update_reminder(
                id,
                UpdateReminder {
                    event_id: input.event_id,
                    description: input.description,
                    date: input.date,
                },
            )
            .await
            .map_err(|e| {
                tracing::error!(reminder_id = id, "failed to update reminder: {:#}", e);
                ServiceError::from(e)
            })?
            .ok_or_else(|| ServiceError::not_found(format!("There is no reminder with id {id}")))?;

        self.db
            .get_reminder_with_user(updated.id)
            .await?
            .ok_or_else(|| {
                ServiceError::from(anyhow::anyhow!(
                    "reminder {} vanished after update",
                    updated.id
                ))
            })
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        tracing::debug!(reminder_id = id, "deleting reminder");
        let existed = self.db.delete_reminder(id).await.map_err(|e| {
            tracing::error!(reminder_id = id, "failed to delete reminder: {:#}", e);
            ServiceError::from(e)
        })?;
        if !existed {
            return Err(ServiceError::not_found(format!(
                "There is no reminder with id {id}"
            )));
        }
        Ok(())
    }

    async fn ensure_event_exists(&self, event_id: Uuid) -> Result<(), ServiceError> {
        if self.db.get_event(event_id).await?.is_none() {
            return Err(ServiceError::not_found(format!(
                "There is no event with id {event_id}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CreateEventRow, CreateUserRow};
    use chrono::TimeZone;

    async fn setup() -> (ReminderService, Uuid) {
        let db = StorageBackend::in_memory();
        let user = db
            .create_user(CreateUserRow {
                id: Uuid::new_v4(),
                name: "Test User".to_string(),
                email: "test@example.com".to_string(),
                password_hash: "$argon2id$fake".to_string(),
                roles: vec!["user".to_string()],
            })
            .await
            .unwrap();
        let event_id = Uuid::new_v4();
        let date = Utc.with_ymd_and_hms(2021, 12, 8, 12, 0, 0).unwrap();
        db.create_event_with_reminder(
            CreateEventRow {
                id: event_id,
                user_id: user.id,
                title: "A".to_string(),
                description: String::new(),
                date,
                event_type: "School".to_string(),
            },
            CreateReminderRow {
                event_id,
                description: "A starts shortly".to_string(),
                date,
            },
        )
        .await
        .unwrap();
        (ReminderService::new(db), event_id)
    }

    #[tokio::test]
    async fn get_by_event_returns_joined_projection() {
        let (service, event_id) = setup().await;
        let row = service.get_by_event_id(event_id).await.unwrap();
        assert_eq!(row.event_id, event_id);
        assert_eq!(row.description, "A starts shortly");
        assert_eq!(row.user_name, "Test User");
    }

    #[tokio::test]
    async fn create_requires_an_existing_event() {
        let (service, _event_id) = setup().await;
        let err = service
            .create(CreateReminderInput {
                event_id: Uuid::new_v4(),
                description: "dangling".to_string(),
                date: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_missing_reminder_is_not_found() {
        let (service, event_id) = setup().await;
        let err = service
            .update_by_id(
                9999,
                UpdateReminderInput {
                    event_id,
                    description: "still here".to_string(),
                    date: Utc::now(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let (service, event_id) = setup().await;
        let row = service.get_by_event_id(event_id).await.unwrap();
        service.delete_by_id(row.reminder_id).await.unwrap();
        assert!(matches!(
            service.delete_by_id(row.reminder_id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
