//! Seating request entities (database row mappings).

use sqlx::FromRow;
use uuid::Uuid;

/// Row of invitee_seating_requests joined with the target's guest name.
#[derive(Debug, Clone, FromRow)]
pub struct SeatingRequestEntity {
    pub invitee_seating_request_id: Uuid,
    pub invitee_id: Uuid,
    pub invitee_request_id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl From<SeatingRequestEntity> for domain::models::InviteeSeatingRequest {
    fn from(entity: SeatingRequestEntity) -> Self {
        Self {
            invitee_seating_request_id: entity.invitee_seating_request_id,
            invitee_id: entity.invitee_id,
            invitee_request_id: entity.invitee_request_id,
            first_name: entity.first_name,
            last_name: entity.last_name,
        }
    }
}

/// Invitee id and name, for listing seating candidates.
#[derive(Debug, Clone, FromRow)]
pub struct SeatingTargetEntity {
    pub invitee_id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl From<SeatingTargetEntity> for domain::models::SeatingTarget {
    fn from(entity: SeatingTargetEntity) -> Self {
        Self {
            invitee_id: entity.invitee_id,
            first_name: entity.first_name,
            last_name: entity.last_name,
        }
    }
}
