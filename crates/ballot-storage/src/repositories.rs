// Repository layer for database operations
//
// Each lifecycle transition is one transaction: the entrant-state change
// and the event counter deltas commit together or not at all. A broadcast
// commits every recipient row plus the audit log row in one transaction.

use anyhow::Result;
use ballot_core::{CounterDeltas, CreateEvent, EntrantRecord, EntrantState};
use ballot_core::{NotificationLog, NotificationRecord};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;

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

    /// Run embedded migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEvent) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (id, name, organizer_id, organizer_name, max_entrants, require_geolocation)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, organizer_id, organizer_name, max_entrants, require_geolocation,
                      waitlisted, selected, enrolled, cancelled, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.name)
        .bind(input.organizer_id)
        .bind(&input.organizer_name)
        .bind(input.max_entrants)
        .bind(input.require_geolocation)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, name, organizer_id, organizer_name, max_entrants, require_geolocation,
                   waitlisted, selected, enrolled, cancelled, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Entrants
    // ============================================

    pub async fn get_entrant(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<EntrantRow>> {
        let row = sqlx::query_as::<_, EntrantRow>(
            r#"
            SELECT event_id, user_id, state, latitude, longitude, joined_at, updated_at
            FROM entrants
            WHERE event_id = $1 AND user_id = $2
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Authoritative waiting-set size, derived from the records
    pub async fn count_waiting(&self, event_id: Uuid) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM entrants WHERE event_id = $1 AND state = 'waiting'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn list_waiting(&self, event_id: Uuid) -> Result<Vec<EntrantRow>> {
        let rows = sqlx::query_as::<_, EntrantRow>(
            r#"
            SELECT event_id, user_id, state, latitude, longitude, joined_at, updated_at
            FROM entrants
            WHERE event_id = $1 AND state = 'waiting'
            ORDER BY joined_at ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Admit a Waiting record conditionally, in one transaction.
    ///
    /// The event row is locked first, so the capacity check runs against a
    /// fresh count and two concurrent joins for the last slot serialize
    /// rather than both passing a stale check. Returns false when the
    /// event is gone, the list is full, or the record already exists.
    pub async fn insert_waiting(&self, record: &EntrantRecord) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let max_entrants: Option<(i32,)> =
            sqlx::query_as("SELECT max_entrants FROM events WHERE id = $1 FOR UPDATE")
                .bind(record.event_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((max_entrants,)) = max_entrants else {
            return Ok(false);
        };

        if max_entrants > 0 {
            let (waiting,): (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM entrants WHERE event_id = $1 AND state = 'waiting'",
            )
            .bind(record.event_id)
            .fetch_one(&mut *tx)
            .await?;
            if waiting >= max_entrants as i64 {
                return Ok(false);
            }
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO entrants (event_id, user_id, state, latitude, longitude, joined_at, updated_at)
            VALUES ($1, $2, 'waiting', $3, $4, $5, $5)
            ON CONFLICT (event_id, user_id) DO NOTHING
            "#,
        )
        .bind(record.event_id)
        .bind(record.user_id)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.joined_at)
        .execute(&mut *tx)
        .await?;
        if inserted.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE events SET waitlisted = waitlisted + 1 WHERE id = $1")
            .bind(record.event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Remove a Waiting record and decrement the counter, atomically.
    /// Returns false (without writes) when the user is not Waiting.
    pub async fn remove_waiting(&self, event_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            "DELETE FROM entrants WHERE event_id = $1 AND user_id = $2 AND state = 'waiting'",
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        if deleted.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE events SET waitlisted = waitlisted - 1 WHERE id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// The transition atomicity unit: conditional state move keyed on the
    /// expected prior state, plus the counter deltas, in one transaction.
    /// Returns false (without writes) on stale state.
    pub async fn transition(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        from: EntrantState,
        to: EntrantState,
        deltas: CounterDeltas,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let moved = sqlx::query(
            r#"
            UPDATE entrants
            SET state = $4, updated_at = NOW()
            WHERE event_id = $1 AND user_id = $2 AND state = $3
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(from.to_string())
        .bind(to.to_string())
        .execute(&mut *tx)
        .await?;
        if moved.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE events
            SET waitlisted = waitlisted + $2,
                selected = selected + $3,
                enrolled = enrolled + $4,
                cancelled = cancelled + $5
            WHERE id = $1
            "#,
        )
        .bind(event_id)
        .bind(deltas.waitlisted)
        .bind(deltas.selected)
        .bind(deltas.enrolled)
        .bind(deltas.cancelled)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    // ============================================
    // Profiles
    // ============================================

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, full_name, email, notifications_enabled, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        full_name: Option<&str>,
        email: Option<&str>,
        notifications_enabled: bool,
    ) -> Result<ProfileRow> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (user_id, full_name, email, notifications_enabled)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                email = EXCLUDED.email,
                notifications_enabled = EXCLUDED.notifications_enabled,
                updated_at = NOW()
            RETURNING user_id, full_name, email, notifications_enabled, updated_at
            "#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(email)
        .bind(notifications_enabled)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Notifications & audit log
    // ============================================

    /// Commit a broadcast: every recipient row plus the log row, or nothing
    pub async fn append_broadcast(
        &self,
        records: &[NotificationRecord],
        log: &NotificationLog,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO notifications (id, recipient_id, event_id, message, kind, read, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(record.id)
            .bind(record.recipient_id)
            .bind(record.event_id)
            .bind(&record.message)
            .bind(record.kind.to_string())
            .bind(record.read)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO notification_logs
                (id, event_id, event_name, organizer_id, organizer_name, message,
                 recipient_count, recipient_ids, recipient_names, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(log.id)
        .bind(log.event_id)
        .bind(&log.event_name)
        .bind(log.organizer_id)
        .bind(&log.organizer_name)
        .bind(&log.message)
        .bind(log.recipient_count)
        .bind(&log.recipient_ids)
        .bind(&log.recipient_names)
        .bind(log.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_selection_notices(&self, event_id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM notifications
            WHERE event_id = $1 AND recipient_id = $2 AND kind = 'selection_offer'
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_notifications(&self, recipient_id: Uuid) -> Result<Vec<NotificationRow>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, recipient_id, event_id, message, kind, read, created_at
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_logs(&self, event_id: Uuid) -> Result<Vec<NotificationLogRow>> {
        let rows = sqlx::query_as::<_, NotificationLogRow>(
            r#"
            SELECT id, event_id, event_name, organizer_id, organizer_name, message,
                   recipient_count, recipient_ids, recipient_names, created_at
            FROM notification_logs
            WHERE event_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
