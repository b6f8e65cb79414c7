//! Storage gateway abstraction.
//!
//! The coordinator talks to storage only through [`InvitationGateway`]. The
//! PostgreSQL implementation lives in the persistence crate; an in-memory one
//! is provided in [`super::memory`] for development and tests.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    CreateEventRequest, CreateInviteeRequest, CreateMenuItemRequest, Event, EventStats, Guest,
    GuestInput, Invitee, InviteeFriend, InviteeSeatingRequest, MenuChoice, MenuItem, MenuNote,
    SeatingTarget, User, UserCredentials, ValidatedChoice,
};

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => GatewayError::NotFound("Record".to_string()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => GatewayError::Conflict(db_err.message().to_string()),
                // foreign_key_violation
                Some("23503") => GatewayError::NotFound("Referenced record".to_string()),
                _ => GatewayError::Database(err.to_string()),
            },
            _ => GatewayError::Database(err.to_string()),
        }
    }
}

/// Storage operations needed by the invitation workflows.
///
/// `replace_*` operations swap the whole set for one owner and must be atomic:
/// either the new set is stored completely or the old one is left untouched.
#[async_trait::async_trait]
pub trait InvitationGateway: Send + Sync {
    // Users

    async fn find_user_by_email(&self, email: &str)
        -> Result<Option<UserCredentials>, GatewayError>;

    async fn get_user(&self, user_id: Uuid) -> Result<User, GatewayError>;

    // Events

    async fn list_events_for_user(&self, user_id: Uuid) -> Result<Vec<Event>, GatewayError>;

    async fn get_event(&self, event_id: Uuid) -> Result<Event, GatewayError>;

    /// Creates the event and makes `user_id` its administrator in one step.
    async fn create_event(
        &self,
        user_id: Uuid,
        request: &CreateEventRequest,
    ) -> Result<Event, GatewayError>;

    async fn is_event_admin(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, GatewayError>;

    async fn get_event_stats(&self, event_id: Uuid) -> Result<EventStats, GatewayError>;

    // Menus

    /// Items ordered by `item_order`, options in insertion order.
    async fn get_menu_items_for_event(&self, event_id: Uuid)
        -> Result<Vec<MenuItem>, GatewayError>;

    async fn create_menu_item(
        &self,
        event_id: Uuid,
        request: &CreateMenuItemRequest,
    ) -> Result<MenuItem, GatewayError>;

    async fn replace_guest_menu_choices(
        &self,
        guest_id: Uuid,
        choices: &[ValidatedChoice],
    ) -> Result<Vec<MenuChoice>, GatewayError>;

    async fn set_guest_menu_note(
        &self,
        guest_id: Uuid,
        note_body: &str,
    ) -> Result<MenuNote, GatewayError>;

    // Invitees

    /// One page of invitees plus the total count for the event.
    async fn list_invitees_for_event(
        &self,
        event_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Invitee>, u64), GatewayError>;

    /// Creates the invitee's guest, the invitee and any initial friends.
    async fn create_invitee(
        &self,
        event_id: Uuid,
        request: &CreateInviteeRequest,
    ) -> Result<Invitee, GatewayError>;

    async fn get_invitee(&self, invitee_id: Uuid) -> Result<Invitee, GatewayError>;

    async fn update_invitee_email(
        &self,
        invitee_id: Uuid,
        email: &str,
    ) -> Result<(), GatewayError>;

    async fn update_guest(&self, guest_id: Uuid, input: &GuestInput)
        -> Result<Guest, GatewayError>;

    async fn get_invitee_friend(&self, friend_id: Uuid) -> Result<InviteeFriend, GatewayError>;

    async fn count_invitee_friends(&self, invitee_id: Uuid) -> Result<i64, GatewayError>;

    async fn create_invitee_friend(
        &self,
        invitee_id: Uuid,
        input: &GuestInput,
    ) -> Result<InviteeFriend, GatewayError>;

    // Seating

    /// Every invitee of the event, as id plus name.
    async fn get_eligible_seating_targets(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<SeatingTarget>, GatewayError>;

    async fn replace_invitee_seating_requests(
        &self,
        invitee_id: Uuid,
        targets: &[Uuid],
    ) -> Result<Vec<InviteeSeatingRequest>, GatewayError>;
}
