//! Invitee entities (database row mappings).
//!
//! Both rows are read joined with their guest.

use sqlx::FromRow;
use uuid::Uuid;

use super::guest::GuestEntity;

/// Row of invitees joined with guests.
#[derive(Debug, Clone, FromRow)]
pub struct InviteeEntity {
    pub invitee_id: Uuid,
    pub event_id: Uuid,
    pub email: String,
    pub guest_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub attending: bool,
}

impl InviteeEntity {
    pub fn guest(&self) -> GuestEntity {
        GuestEntity {
            guest_id: self.guest_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            attending: self.attending,
        }
    }
}

/// Row of invitee_friends joined with guests.
#[derive(Debug, Clone, FromRow)]
pub struct InviteeFriendEntity {
    pub invitee_friend_id: Uuid,
    pub invitee_id: Uuid,
    pub guest_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub attending: bool,
}

impl InviteeFriendEntity {
    pub fn guest(&self) -> GuestEntity {
        GuestEntity {
            guest_id: self.guest_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            attending: self.attending,
        }
    }
}
