//! Event entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub event_id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub respond_by: DateTime<Utc>,
    pub allowed_friends: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for domain::models::Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            event_id: entity.event_id,
            name: entity.name,
            description: entity.description,
            location: entity.location,
            start_time: entity.start_time,
            end_time: entity.end_time,
            respond_by: entity.respond_by,
            allowed_friends: entity.allowed_friends,
        }
    }
}

/// Aggregated head counts for one event.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct EventStatsEntity {
    pub total_invitees: i64,
    pub total_friends: i64,
    pub attending_guests: i64,
}

impl From<EventStatsEntity> for domain::models::EventStats {
    fn from(entity: EventStatsEntity) -> Self {
        Self {
            total_invitees: entity.total_invitees,
            total_friends: entity.total_friends,
            total_guests: entity.total_invitees + entity.total_friends,
            attending_guests: entity.attending_guests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::EventStats;

    #[test]
    fn test_stats_total_guests() {
        let stats: EventStats = EventStatsEntity {
            total_invitees: 4,
            total_friends: 3,
            attending_guests: 5,
        }
        .into();
        assert_eq!(stats.total_guests, 7);
        assert_eq!(stats.attending_guests, 5);
    }
}
