//! Seating request repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{SeatingRequestEntity, SeatingTargetEntity};
use crate::metrics::QueryTimer;

/// Repository for invitee seating requests.
#[derive(Clone)]
pub struct SeatingRepository {
    pool: PgPool,
}

impl SeatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every invitee of an event that can be requested as a seating partner.
    pub async fn targets_for_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<SeatingTargetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("seating_targets_for_event");
        let result = sqlx::query_as::<_, SeatingTargetEntity>(
            r#"
            SELECT i.invitee_id, g.first_name, g.last_name
            FROM invitees i
            JOIN guests g ON g.guest_id = i.guest_id
            WHERE i.event_id = $1
            ORDER BY g.last_name, g.first_name, i.invitee_id
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn requests_for_invitees(
        &self,
        invitee_ids: &[Uuid],
    ) -> Result<Vec<SeatingRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("seating_requests_for_invitees");
        let result = sqlx::query_as::<_, SeatingRequestEntity>(
            r#"
            SELECT r.invitee_seating_request_id, r.invitee_id, r.invitee_request_id,
                   g.first_name, g.last_name
            FROM invitee_seating_requests r
            JOIN invitees t ON t.invitee_id = r.invitee_request_id
            JOIN guests g ON g.guest_id = t.guest_id
            WHERE r.invitee_id = ANY($1)
            ORDER BY r.created_at, r.invitee_seating_request_id
            "#,
        )
        .bind(invitee_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace an invitee's seating requests with the given targets.
    pub async fn replace_requests(
        &self,
        invitee_id: Uuid,
        targets: &[Uuid],
    ) -> Result<Vec<SeatingRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("replace_seating_requests");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM invitee_seating_requests WHERE invitee_id = $1
            "#,
        )
        .bind(invitee_id)
        .execute(&mut *tx)
        .await?;

        for target in targets {
            sqlx::query(
                r#"
                INSERT INTO invitee_seating_requests (invitee_id, invitee_request_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(invitee_id)
            .bind(target)
            .execute(&mut *tx)
            .await?;
        }

        let stored = sqlx::query_as::<_, SeatingRequestEntity>(
            r#"
            SELECT r.invitee_seating_request_id, r.invitee_id, r.invitee_request_id,
                   g.first_name, g.last_name
            FROM invitee_seating_requests r
            JOIN invitees t ON t.invitee_id = r.invitee_request_id
            JOIN guests g ON g.guest_id = t.guest_id
            WHERE r.invitee_id = $1
            ORDER BY r.created_at, r.invitee_seating_request_id
            "#,
        )
        .bind(invitee_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(stored)
    }
}
