//! Invitee repository for database operations.
//!
//! Covers invitees, their friends and the guest rows behind both.

use domain::models::{CreateInviteeRequest, GuestInput};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::{GuestEntity, InviteeEntity, InviteeFriendEntity};
use crate::metrics::QueryTimer;

const INVITEE_COLUMNS: &str = r#"
    i.invitee_id, i.event_id, i.email, g.guest_id, g.first_name, g.last_name, g.attending
"#;

const FRIEND_COLUMNS: &str = r#"
    f.invitee_friend_id, f.invitee_id, g.guest_id, g.first_name, g.last_name, g.attending
"#;

/// Repository for invitee-related database operations.
#[derive(Clone)]
pub struct InviteeRepository {
    pool: PgPool,
}

async fn insert_guest(
    conn: &mut PgConnection,
    input: &GuestInput,
) -> Result<GuestEntity, sqlx::Error> {
    sqlx::query_as::<_, GuestEntity>(
        r#"
        INSERT INTO guests (first_name, last_name, attending)
        VALUES ($1, $2, $3)
        RETURNING guest_id, first_name, last_name, attending
        "#,
    )
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(input.attending)
    .fetch_one(conn)
    .await
}

async fn insert_friend(
    conn: &mut PgConnection,
    invitee_id: Uuid,
    input: &GuestInput,
) -> Result<InviteeFriendEntity, sqlx::Error> {
    let guest = insert_guest(&mut *conn, input).await?;

    let invitee_friend_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO invitee_friends (invitee_id, guest_id)
        VALUES ($1, $2)
        RETURNING invitee_friend_id
        "#,
    )
    .bind(invitee_id)
    .bind(guest.guest_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(InviteeFriendEntity {
        invitee_friend_id,
        invitee_id,
        guest_id: guest.guest_id,
        first_name: guest.first_name,
        last_name: guest.last_name,
        attending: guest.attending,
    })
}

impl InviteeRepository {
    /// Creates a new InviteeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the invitee's guest, the invitee and any initial friends atomically.
    pub async fn create_invitee(
        &self,
        event_id: Uuid,
        request: &CreateInviteeRequest,
    ) -> Result<InviteeEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invitee");

        let mut tx = self.pool.begin().await?;

        let guest = insert_guest(&mut tx, &request.guest).await?;

        let invitee_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO invitees (event_id, guest_id, email)
            VALUES ($1, $2, LOWER($3))
            RETURNING invitee_id
            "#,
        )
        .bind(event_id)
        .bind(guest.guest_id)
        .bind(&request.email)
        .fetch_one(&mut *tx)
        .await?;

        for friend in &request.friends {
            insert_friend(&mut tx, invitee_id, friend).await?;
        }

        tx.commit().await?;
        timer.record();

        Ok(InviteeEntity {
            invitee_id,
            event_id,
            email: request.email.to_lowercase(),
            guest_id: guest.guest_id,
            first_name: guest.first_name,
            last_name: guest.last_name,
            attending: guest.attending,
        })
    }

    /// Find an invitee by ID.
    pub async fn find_by_id(&self, invitee_id: Uuid) -> Result<Option<InviteeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitee_by_id");
        let sql = format!(
            r#"
            SELECT {INVITEE_COLUMNS}
            FROM invitees i
            JOIN guests g ON g.guest_id = i.guest_id
            WHERE i.invitee_id = $1
            "#
        );
        let result = sqlx::query_as::<_, InviteeEntity>(&sql)
            .bind(invitee_id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// One page of an event's invitees in creation order.
    pub async fn list_for_event(
        &self,
        event_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InviteeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_invitees_for_event");
        let sql = format!(
            r#"
            SELECT {INVITEE_COLUMNS}
            FROM invitees i
            JOIN guests g ON g.guest_id = i.guest_id
            WHERE i.event_id = $1
            ORDER BY i.created_at, i.invitee_id
            LIMIT $2 OFFSET $3
            "#
        );
        let result = sqlx::query_as::<_, InviteeEntity>(&sql)
            .bind(event_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn count_for_event(&self, event_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_invitees_for_event");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM invitees WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update an invitee's email. Returns the number of rows touched.
    pub async fn update_email(&self, invitee_id: Uuid, email: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_invitee_email");
        let result = sqlx::query(
            r#"
            UPDATE invitees
            SET email = LOWER($2), updated_at = NOW()
            WHERE invitee_id = $1
            "#,
        )
        .bind(invitee_id)
        .bind(email)
        .execute(&self.pool)
        .await
        .map(|done| done.rows_affected());
        timer.record();
        result
    }

    /// Update a guest's editable fields.
    pub async fn update_guest(
        &self,
        guest_id: Uuid,
        input: &GuestInput,
    ) -> Result<Option<GuestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_guest");
        let result = sqlx::query_as::<_, GuestEntity>(
            r#"
            UPDATE guests
            SET first_name = $2, last_name = $3, attending = $4, updated_at = NOW()
            WHERE guest_id = $1
            RETURNING guest_id, first_name, last_name, attending
            "#,
        )
        .bind(guest_id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.attending)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Friends of the given invitees in creation order.
    pub async fn friends_for_invitees(
        &self,
        invitee_ids: &[Uuid],
    ) -> Result<Vec<InviteeFriendEntity>, sqlx::Error> {
        let timer = QueryTimer::new("friends_for_invitees");
        let sql = format!(
            r#"
            SELECT {FRIEND_COLUMNS}
            FROM invitee_friends f
            JOIN guests g ON g.guest_id = f.guest_id
            WHERE f.invitee_id = ANY($1)
            ORDER BY f.created_at, f.invitee_friend_id
            "#
        );
        let result = sqlx::query_as::<_, InviteeFriendEntity>(&sql)
            .bind(invitee_ids)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_friend(
        &self,
        invitee_friend_id: Uuid,
    ) -> Result<Option<InviteeFriendEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitee_friend");
        let sql = format!(
            r#"
            SELECT {FRIEND_COLUMNS}
            FROM invitee_friends f
            JOIN guests g ON g.guest_id = f.guest_id
            WHERE f.invitee_friend_id = $1
            "#
        );
        let result = sqlx::query_as::<_, InviteeFriendEntity>(&sql)
            .bind(invitee_friend_id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn count_friends(&self, invitee_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_invitee_friends");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM invitee_friends WHERE invitee_id = $1
            "#,
        )
        .bind(invitee_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a friend and its guest atomically.
    pub async fn create_friend(
        &self,
        invitee_id: Uuid,
        input: &GuestInput,
    ) -> Result<InviteeFriendEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invitee_friend");

        let mut tx = self.pool.begin().await?;
        let friend = insert_friend(&mut tx, invitee_id, input).await?;
        tx.commit().await?;

        timer.record();
        Ok(friend)
    }
}
