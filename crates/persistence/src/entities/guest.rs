//! Guest entity (database row mapping).

use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the guests table.
#[derive(Debug, Clone, FromRow)]
pub struct GuestEntity {
    pub guest_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub attending: bool,
}
