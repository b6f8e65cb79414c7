//! Event repository for database operations.

use domain::models::CreateEventRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EventEntity, EventStatsEntity};
use crate::metrics::QueryTimer;

/// Repository for event-related database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an event and register the creator as its administrator.
    pub async fn create_event(
        &self,
        user_id: Uuid,
        request: &CreateEventRequest,
    ) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");

        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (name, description, location, start_time, end_time, respond_by, allowed_friends)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING event_id, name, description, location, start_time, end_time, respond_by,
                      allowed_friends, created_at, updated_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.location)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.respond_by)
        .bind(request.allowed_friends)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO event_admins (user_id, event_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(event.event_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(event)
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, event_id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT event_id, name, description, location, start_time, end_time, respond_by,
                   allowed_friends, created_at, updated_at
            FROM events
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the events a user administers, soonest first.
    pub async fn list_for_admin(&self, user_id: Uuid) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_for_admin");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT e.event_id, e.name, e.description, e.location, e.start_time, e.end_time,
                   e.respond_by, e.allowed_friends, e.created_at, e.updated_at
            FROM events e
            JOIN event_admins a ON a.event_id = e.event_id
            WHERE a.user_id = $1
            ORDER BY e.start_time, e.event_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether a user administers an event.
    pub async fn is_admin(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("is_event_admin");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM event_admins WHERE event_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Head counts for an event.
    pub async fn stats(&self, event_id: Uuid) -> Result<EventStatsEntity, sqlx::Error> {
        let timer = QueryTimer::new("event_stats");
        let result = sqlx::query_as::<_, EventStatsEntity>(
            r#"
            WITH event_guests AS (
                SELECT i.guest_id FROM invitees i WHERE i.event_id = $1
                UNION ALL
                SELECT f.guest_id
                FROM invitee_friends f
                JOIN invitees i ON i.invitee_id = f.invitee_id
                WHERE i.event_id = $1
            )
            SELECT
                (SELECT COUNT(*) FROM invitees WHERE event_id = $1) AS total_invitees,
                (SELECT COUNT(*)
                   FROM invitee_friends f
                   JOIN invitees i ON i.invitee_id = f.invitee_id
                  WHERE i.event_id = $1) AS total_friends,
                (SELECT COUNT(*)
                   FROM event_guests eg
                   JOIN guests g ON g.guest_id = eg.guest_id
                  WHERE g.attending) AS attending_guests
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
