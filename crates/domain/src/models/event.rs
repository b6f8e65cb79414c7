//! Event domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// An event an organizer invites people to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub event_id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub respond_by: DateTime<Utc>,
    /// Maximum number of friends each invitee may bring.
    pub allowed_friends: i32,
}

/// Request to create a new event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
#[validate(schema(function = "validate_event_times"))]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 4000, message = "description must be at most 4000 characters"))]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "location must be at most 500 characters"))]
    pub location: String,

    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub respond_by: DateTime<Utc>,

    #[serde(default)]
    #[validate(range(min = 0, max = 20, message = "allowed_friends must be between 0 and 20"))]
    pub allowed_friends: i32,
}

fn validate_event_times(request: &CreateEventRequest) -> Result<(), ValidationError> {
    if request.end_time < request.start_time {
        let mut err = ValidationError::new("event_times");
        err.message = Some("end_time must not be before start_time".into());
        return Err(err);
    }
    Ok(())
}

/// Head counts for an event, visible to its administrators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventStats {
    pub total_invitees: i64,
    pub total_friends: i64,
    pub total_guests: i64,
    pub attending_guests: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request() -> CreateEventRequest {
        let start = Utc::now() + Duration::days(30);
        CreateEventRequest {
            name: "Summer Wedding".to_string(),
            description: "Reception to follow".to_string(),
            location: "Lakeside Hall".to_string(),
            start_time: start,
            end_time: start + Duration::hours(6),
            respond_by: start - Duration::days(14),
            allowed_friends: 1,
        }
    }

    #[test]
    fn test_create_event_request_valid() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_create_event_request_empty_name() {
        let mut req = request();
        req.name = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_event_request_end_before_start() {
        let mut req = request();
        req.end_time = req.start_time - Duration::hours(1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_event_request_negative_friends() {
        let mut req = request();
        req.allowed_friends = -1;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_event_request_defaults() {
        let json = serde_json::json!({
            "name": "Gala",
            "start_time": "2030-06-01T18:00:00Z",
            "end_time": "2030-06-01T23:00:00Z",
            "respond_by": "2030-05-01T00:00:00Z"
        });
        let req: CreateEventRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.allowed_friends, 0);
        assert!(req.description.is_empty());
        assert!(req.validate().is_ok());
    }
}
