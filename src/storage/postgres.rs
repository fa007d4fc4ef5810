// PostgreSQL repository
//
// Compound event/reminder operations run inside a single transaction so a
// failure between the two writes never leaves the tables out of step.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::*;

const EVENT_USER_COLUMNS: &str = "\
    e.id AS event_id, e.title, e.description, e.date, e.event_type, \
    u.id AS user_id, u.name AS user_name";

const REMINDER_USER_COLUMNS: &str = "\
    r.id AS reminder_id, r.event_id, r.description, r.date, \
    u.id AS user_id, u.name AS user_name";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, password_hash, roles)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, roles, created_at, updated_at
            "#,
        )
        .bind(input.id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(serde_json::to_value(&input.roles)?)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, roles, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, roles, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, roles, created_at, updated_at
            FROM users
            ORDER BY email ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_users(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, roles, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Delete a user; owned events and their reminders go with it via the
    /// schema's FK cascades.
    pub async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Events (compound lifecycle operations)
    // ============================================

    /// Insert an event and its derived reminder as one unit of work, then
    /// return the joined projection of the fresh row.
    pub async fn create_event_with_reminder(
        &self,
        event: CreateEventRow,
        reminder: CreateReminderRow,
    ) -> Result<EventUserRow> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO events (id, user_id, title, description, date, event_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.event_type)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO reminders (event_id, description, date)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(reminder.event_id)
        .bind(&reminder.description)
        .bind(reminder.date)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, EventUserRow>(&format!(
            r#"
            SELECT {EVENT_USER_COLUMNS}
            FROM events e
            JOIN users u ON e.user_id = u.id
            WHERE e.id = $1
            "#
        ))
        .bind(event.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Replace the event row, drop any reminders tied to it and insert one
    /// fresh reminder, all in one transaction. Returns None (and rolls back)
    /// when the event does not exist.
    pub async fn update_event_with_reminder(
        &self,
        id: Uuid,
        event: UpdateEvent,
        reminder: CreateReminderRow,
    ) -> Result<Option<EventUserRow>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE events
            SET user_id = $2, title = $3, description = $4, date = $5, event_type = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(event.user_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.event_type)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query("DELETE FROM reminders WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO reminders (event_id, description, date)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(reminder.event_id)
        .bind(&reminder.description)
        .bind(reminder.date)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, EventUserRow>(&format!(
            r#"
            SELECT {EVENT_USER_COLUMNS}
            FROM events e
            JOIN users u ON e.user_id = u.id
            WHERE e.id = $1
            "#
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(row))
    }

    /// Delete reminders first, then the event row. Returns whether the event
    /// existed.
    pub async fn delete_event_cascade(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM reminders WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, user_id, title, description, date, event_type
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event_with_user(&self, id: Uuid) -> Result<Option<EventUserRow>> {
        let row = sqlx::query_as::<_, EventUserRow>(&format!(
            r#"
            SELECT {EVENT_USER_COLUMNS}
            FROM events e
            JOIN users u ON e.user_id = u.id
            WHERE e.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Events ascending by date; ties broken by id so pages never overlap.
    pub async fn list_events_with_user(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EventUserRow>> {
        let rows = sqlx::query_as::<_, EventUserRow>(&format!(
            r#"
            SELECT {EVENT_USER_COLUMNS}
            FROM events e
            JOIN users u ON e.user_id = u.id
            ORDER BY e.date ASC, e.id ASC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_events(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // ============================================
    // Reminders (direct surface)
    // ============================================

    pub async fn create_reminder(&self, input: CreateReminderRow) -> Result<ReminderRow> {
        let row = sqlx::query_as::<_, ReminderRow>(
            r#"
            INSERT INTO reminders (event_id, description, date)
            VALUES ($1, $2, $3)
            RETURNING id, event_id, description, date
            "#,
        )
        .bind(input.event_id)
        .bind(&input.description)
        .bind(input.date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_reminder_with_user(&self, id: i64) -> Result<Option<ReminderUserRow>> {
        let row = sqlx::query_as::<_, ReminderUserRow>(&format!(
            r#"
            SELECT {REMINDER_USER_COLUMNS}
            FROM reminders r
            JOIN events e ON r.event_id = e.id
            JOIN users u ON e.user_id = u.id
            WHERE r.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_reminder_with_user_by_event(
        &self,
        event_id: Uuid,
    ) -> Result<Option<ReminderUserRow>> {
        let row = sqlx::query_as::<_, ReminderUserRow>(&format!(
            r#"
            SELECT {REMINDER_USER_COLUMNS}
            FROM reminders r
            JOIN events e ON r.event_id = e.id
            JOIN users u ON e.user_id = u.id
            WHERE r.event_id = $1
            ORDER BY r.id ASC
            "#
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_reminders_with_user(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReminderUserRow>> {
        let rows = sqlx::query_as::<_, ReminderUserRow>(&format!(
            r#"
            SELECT {REMINDER_USER_COLUMNS}
            FROM reminders r
            JOIN events e ON r.event_id = e.id
            JOIN users u ON e.user_id = u.id
            ORDER BY r.id ASC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_reminders(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reminders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn update_reminder(
        &self,
        id: i64,
        input: UpdateReminder,
    ) -> Result<Option<ReminderRow>> {
        let row = sqlx::query_as::<_, ReminderRow>(
            r#"
            UPDATE reminders
            SET event_id = $2, description = $3, date = $4
            WHERE id = $1
            RETURNING id, event_id, description, date
            "#,
        )
        .bind(id)
        .bind(input.event_id)
        .bind(&input.description)
        .bind(input.date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_reminder(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
