// In-memory storage implementation for dev mode and tests
// Decision: Use parking_lot for thread-safe access
//
// Provides the same API as the Postgres repository backed by maps, so the
// server can run without a database. Compound event/reminder operations
// validate first and then mutate under write locks, which makes them
// all-or-nothing like their transactional counterparts.

use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use super::models::*;

/// In-memory database; all data is lost on restart.
#[derive(Default)]
pub struct InMemoryDatabase {
    users: RwLock<HashMap<Uuid, UserRow>>,
    events: RwLock<HashMap<Uuid, EventRow>>,
    // BTreeMap keeps reminders in id order, matching the SQL ordering
    reminders: RwLock<BTreeMap<i64, ReminderRow>>,
    next_reminder_id: RwLock<i64>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_reminder_id(&self) -> i64 {
        let mut guard = self.next_reminder_id.write();
        *guard += 1;
        *guard
    }

    fn join_event(users: &HashMap<Uuid, UserRow>, event: &EventRow) -> Result<EventUserRow> {
        let user = users
            .get(&event.user_id)
            .ok_or_else(|| anyhow!("user {} referenced by event {} does not exist", event.user_id, event.id))?;
        Ok(EventUserRow {
            event_id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            event_type: event.event_type.clone(),
            user_id: user.id,
            user_name: user.name.clone(),
        })
    }

    fn join_reminder(
        &self,
        events: &HashMap<Uuid, EventRow>,
        users: &HashMap<Uuid, UserRow>,
        reminder: &ReminderRow,
    ) -> Result<ReminderUserRow> {
        let event = events
            .get(&reminder.event_id)
            .ok_or_else(|| anyhow!("event {} referenced by reminder {} does not exist", reminder.event_id, reminder.id))?;
        let user = users
            .get(&event.user_id)
            .ok_or_else(|| anyhow!("user {} referenced by event {} does not exist", event.user_id, event.id))?;
        Ok(ReminderUserRow {
            reminder_id: reminder.id,
            event_id: reminder.event_id,
            description: reminder.description.clone(),
            date: reminder.date,
            user_id: user.id,
            user_name: user.name.clone(),
        })
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        let mut users = self.users.write();
        if users.values().any(|u| u.email == input.email) {
            return Err(anyhow!("duplicate email {}", input.email));
        }
        let now = chrono::Utc::now();
        let row = UserRow {
            id: input.id,
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            roles: serde_json::to_value(&input.roles)?,
            created_at: now,
            updated_at: now,
        };
        users.insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        Ok(self.users.read().get(&id).cloned())
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<UserRow>> {
        let users = self.users.read();
        let mut rows: Vec<_> = users.values().cloned().collect();
        rows.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    pub async fn count_users(&self) -> Result<i64> {
        Ok(self.users.read().len() as i64)
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> Result<Option<UserRow>> {
        let mut users = self.users.write();
        if let Some(user) = users.get_mut(&id) {
            if let Some(name) = input.name {
                user.name = name;
            }
            if let Some(email) = input.email {
                user.email = email;
            }
            user.updated_at = chrono::Utc::now();
            return Ok(Some(user.clone()));
        }
        Ok(None)
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<bool> {
        // Lock order: users -> events -> reminders, same as the compound ops
        let mut users = self.users.write();
        let mut events = self.events.write();
        let mut reminders = self.reminders.write();

        if users.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: Vec<Uuid> = events
            .values()
            .filter(|e| e.user_id == id)
            .map(|e| e.id)
            .collect();
        for event_id in owned {
            events.remove(&event_id);
            reminders.retain(|_, r| r.event_id != event_id);
        }
        Ok(true)
    }

    // ============================================
    // Events (compound lifecycle operations)
    // ============================================

    pub async fn create_event_with_reminder(
        &self,
        event: CreateEventRow,
        reminder: CreateReminderRow,
    ) -> Result<EventUserRow> {
        let users = self.users.read();
        let mut events = self.events.write();
        let mut reminders = self.reminders.write();

        if !users.contains_key(&event.user_id) {
            return Err(anyhow!("user {} does not exist", event.user_id));
        }

        let event_row = EventRow {
            id: event.id,
            user_id: event.user_id,
            title: event.title,
            description: event.description,
            date: event.date,
            event_type: event.event_type,
        };
        events.insert(event_row.id, event_row.clone());

        let reminder_id = self.next_reminder_id();
        reminders.insert(
            reminder_id,
            ReminderRow {
                id: reminder_id,
                event_id: reminder.event_id,
                description: reminder.description,
                date: reminder.date,
            },
        );

        Self::join_event(&users, &event_row)
    }

    pub async fn update_event_with_reminder(
        &self,
        id: Uuid,
        event: UpdateEvent,
        reminder: CreateReminderRow,
    ) -> Result<Option<EventUserRow>> {
        let users = self.users.read();
        let mut events = self.events.write();
        let mut reminders = self.reminders.write();

        let row = match events.get_mut(&id) {
            Some(row) => row,
            None => return Ok(None),
        };
        row.user_id = event.user_id;
        row.title = event.title;
        row.description = event.description;
        row.date = event.date;
        row.event_type = event.event_type;
        let updated = row.clone();

        reminders.retain(|_, r| r.event_id != id);
        let reminder_id = self.next_reminder_id();
        reminders.insert(
            reminder_id,
            ReminderRow {
                id: reminder_id,
                event_id: reminder.event_id,
                description: reminder.description,
                date: reminder.date,
            },
        );

        Ok(Some(Self::join_event(&users, &updated)?))
    }

    pub async fn delete_event_cascade(&self, id: Uuid) -> Result<bool> {
        let mut events = self.events.write();
        let mut reminders = self.reminders.write();

        reminders.retain(|_, r| r.event_id != id);
        Ok(events.remove(&id).is_some())
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        Ok(self.events.read().get(&id).cloned())
    }

    pub async fn get_event_with_user(&self, id: Uuid) -> Result<Option<EventUserRow>> {
        let users = self.users.read();
        let events = self.events.read();
        match events.get(&id) {
            Some(event) => Ok(Some(Self::join_event(&users, event)?)),
            None => Ok(None),
        }
    }

    pub async fn list_events_with_user(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EventUserRow>> {
        let users = self.users.read();
        let events = self.events.read();
        let mut rows: Vec<_> = events.values().cloned().collect();
        // Ascending by date, ties broken by id, matching the SQL ordering
        rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        rows.into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|e| Self::join_event(&users, &e))
            .collect()
    }

    pub async fn count_events(&self) -> Result<i64> {
        Ok(self.events.read().len() as i64)
    }

    // ============================================
    // Reminders (direct surface)
    // ============================================

    pub async fn create_reminder(&self, input: CreateReminderRow) -> Result<ReminderRow> {
        let events = self.events.read();
        let mut reminders = self.reminders.write();

        if !events.contains_key(&input.event_id) {
            return Err(anyhow!("event {} does not exist", input.event_id));
        }

        let id = self.next_reminder_id();
        let row = ReminderRow {
            id,
            event_id: input.event_id,
            description: input.description,
            date: input.date,
        };
        reminders.insert(id, row.clone());
        Ok(row)
    }

    pub async fn get_reminder_with_user(&self, id: i64) -> Result<Option<ReminderUserRow>> {
        let users = self.users.read();
        let events = self.events.read();
        let reminders = self.reminders.read();
        match reminders.get(&id) {
            Some(reminder) => Ok(Some(self.join_reminder(&events, &users, reminder)?)),
            None => Ok(None),
        }
    }

    pub async fn get_reminder_with_user_by_event(
        &self,
        event_id: Uuid,
    ) -> Result<Option<ReminderUserRow>> {
        let users = self.users.read();
        let events = self.events.read();
        let reminders = self.reminders.read();
        match reminders.values().find(|r| r.event_id == event_id) {
            Some(reminder) => Ok(Some(self.join_reminder(&events, &users, reminder)?)),
            None => Ok(None),
        }
    }

    pub async fn list_reminders_with_user(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReminderUserRow>> {
        let users = self.users.read();
        let events = self.events.read();
        let reminders = self.reminders.read();
        reminders
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|r| self.join_reminder(&events, &users, r))
            .collect()
    }

    pub async fn count_reminders(&self) -> Result<i64> {
        Ok(self.reminders.read().len() as i64)
    }

    pub async fn update_reminder(
        &self,
        id: i64,
        input: UpdateReminder,
    ) -> Result<Option<ReminderRow>> {
        let events = self.events.read();
        let mut reminders = self.reminders.write();

        if !events.contains_key(&input.event_id) {
            return Err(anyhow!("event {} does not exist", input.event_id));
        }

        if let Some(reminder) = reminders.get_mut(&id) {
            reminder.event_id = input.event_id;
            reminder.description = input.description;
            reminder.date = input.date;
            return Ok(Some(reminder.clone()));
        }
        Ok(None)
    }

    pub async fn delete_reminder(&self, id: i64) -> Result<bool> {
        Ok(self.reminders.write().remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn user_input(email: &str) -> CreateUserRow {
        CreateUserRow {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            roles: vec!["user".to_string()],
        }
    }

    fn event_input(user_id: Uuid, title: &str, hour: u32) -> (CreateEventRow, CreateReminderRow) {
        let id = Uuid::new_v4();
        let date = Utc.with_ymd_and_hms(2021, 12, 8, hour, 0, 0).unwrap();
        (
            CreateEventRow {
                id,
                user_id,
                title: title.to_string(),
                description: String::new(),
                date,
                event_type: "School".to_string(),
            },
            CreateReminderRow {
                event_id: id,
                description: format!("{title} starts shortly"),
                date,
            },
        )
    }

    #[tokio::test]
    async fn create_event_also_creates_reminder() {
        let db = InMemoryDatabase::new();
        let user = db.create_user(user_input("a@example.com")).await.unwrap();

        let (event, reminder) = event_input(user.id, "A", 12);
        let row = db
            .create_event_with_reminder(event.clone(), reminder)
            .await
            .unwrap();

        assert_eq!(row.title, "A");
        assert_eq!(row.user_name, "Test User");
        assert_eq!(db.count_reminders().await.unwrap(), 1);
        let joined = db
            .get_reminder_with_user_by_event(event.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(joined.event_id, event.id);
        assert_eq!(joined.description, "A starts shortly");
    }

    #[tokio::test]
    async fn update_event_replaces_reminder() {
        let db = InMemoryDatabase::new();
        let user = db.create_user(user_input("a@example.com")).await.unwrap();
        let (event, reminder) = event_input(user.id, "A", 12);
        db.create_event_with_reminder(event.clone(), reminder)
            .await
            .unwrap();
        let old = db
            .get_reminder_with_user_by_event(event.id)
            .await
            .unwrap()
            .unwrap();

        let new_date = Utc.with_ymd_and_hms(2021, 12, 9, 9, 0, 0).unwrap();
        let updated = db
            .update_event_with_reminder(
                event.id,
                UpdateEvent {
                    user_id: user.id,
                    title: "A2".to_string(),
                    description: "changed".to_string(),
                    date: new_date,
                    event_type: "Work".to_string(),
                },
                CreateReminderRow {
                    event_id: event.id,
                    description: "changed".to_string(),
                    date: new_date,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "A2");
        // Exactly one reminder, carrying the new values, with a fresh id
        assert_eq!(db.count_reminders().await.unwrap(), 1);
        let fresh = db
            .get_reminder_with_user_by_event(event.id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(fresh.reminder_id, old.reminder_id);
        assert_eq!(fresh.description, "changed");
        assert_eq!(fresh.date, new_date);
    }

    #[tokio::test]
    async fn delete_event_cascades_and_reports_absence() {
        let db = InMemoryDatabase::new();
        let user = db.create_user(user_input("a@example.com")).await.unwrap();
        let (event, reminder) = event_input(user.id, "A", 12);
        db.create_event_with_reminder(event.clone(), reminder)
            .await
            .unwrap();

        assert!(db.delete_event_cascade(event.id).await.unwrap());
        assert_eq!(db.count_reminders().await.unwrap(), 0);
        assert_eq!(db.count_events().await.unwrap(), 0);
        // Second delete reports "did not exist" instead of failing
        assert!(!db.delete_event_cascade(event.id).await.unwrap());
    }

    #[tokio::test]
    async fn events_list_is_ordered_by_date() {
        let db = InMemoryDatabase::new();
        let user = db.create_user(user_input("a@example.com")).await.unwrap();
        for (title, hour) in [("late", 17), ("early", 12), ("middle", 15)] {
            let (event, reminder) = event_input(user.id, title, hour);
            db.create_event_with_reminder(event, reminder).await.unwrap();
        }

        let rows = db.list_events_with_user(100, 0).await.unwrap();
        let titles: Vec<_> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["early", "middle", "late"]);

        let window = db.list_events_with_user(2, 1).await.unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].title, "middle");
        assert_eq!(db.count_events().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let db = InMemoryDatabase::new();
        db.create_user(user_input("a@example.com")).await.unwrap();
        assert!(db.create_user(user_input("a@example.com")).await.is_err());
    }

    #[tokio::test]
    async fn deleting_user_cascades_events_and_reminders() {
        let db = InMemoryDatabase::new();
        let user = db.create_user(user_input("a@example.com")).await.unwrap();
        let (event, reminder) = event_input(user.id, "A", 12);
        db.create_event_with_reminder(event, reminder).await.unwrap();

        assert!(db.delete_user(user.id).await.unwrap());
        assert_eq!(db.count_events().await.unwrap(), 0);
        assert_eq!(db.count_reminders().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reminder_ids_are_sequential() {
        let db = InMemoryDatabase::new();
        let user = db.create_user(user_input("a@example.com")).await.unwrap();
        let (e1, r1) = event_input(user.id, "one", 12);
        let (e2, r2) = event_input(user.id, "two", 13);
        db.create_event_with_reminder(e1, r1).await.unwrap();
        db.create_event_with_reminder(e2, r2).await.unwrap();

        let rows = db.list_reminders_with_user(100, 0).await.unwrap();
        assert_eq!(rows[0].reminder_id, 1);
        assert_eq!(rows[1].reminder_id, 2);
    }
}
