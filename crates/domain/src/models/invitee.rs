//! Invitee domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::guest::{Guest, GuestInput};
use super::seating::{InviteeSeatingRequest, SeatingRequestView};
use shared::pagination::PageInfo;

/// An invitee as stored, with raw seating request targets.
///
/// Never serialized to clients directly; see [`InviteeResponse`].
#[derive(Debug, Clone, PartialEq)]
pub struct Invitee {
    pub invitee_id: Uuid,
    pub event_id: Uuid,
    pub email: String,
    pub guest: Guest,
    pub friends: Vec<InviteeFriend>,
    pub seating_requests: Vec<InviteeSeatingRequest>,
}

/// A friend an invitee brings along.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteeFriend {
    pub invitee_friend_id: Uuid,
    pub invitee_id: Uuid,
    #[serde(rename = "self")]
    pub guest: Guest,
}

/// Invitee as returned over the API, seating targets tokenised.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteeResponse {
    pub invitee_id: Uuid,
    pub event_id: Uuid,
    pub email: String,
    #[serde(rename = "self")]
    pub guest: Guest,
    pub friends: Vec<InviteeFriend>,
    pub seating_requests: Vec<SeatingRequestView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListInviteesResponse {
    pub data: Vec<InviteeResponse>,
    pub pagination: PageInfo,
}

/// Request to add an invitee (and optionally their friends) to an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInviteeRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,

    #[serde(rename = "self")]
    #[validate(nested)]
    pub guest: GuestInput,

    #[serde(default)]
    #[validate(nested)]
    pub friends: Vec<GuestInput>,
}

/// Partial update of an invitee. The self guest id never changes.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct EditInviteeRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,

    #[serde(rename = "self")]
    #[validate(nested)]
    pub guest: Option<GuestInput>,
}

/// Body for creating or editing a friend.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct InviteeFriendRequest {
    #[serde(rename = "self")]
    #[validate(nested)]
    pub guest: GuestInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_invitee_request_from_json() {
        let json = serde_json::json!({
            "email": "ada@example.com",
            "self": { "first_name": "Ada", "last_name": "Lovelace", "attending": true },
            "friends": [{ "first_name": "Charles", "last_name": "Babbage" }]
        });
        let req: CreateInviteeRequest = serde_json::from_value(json).unwrap();

        assert!(req.validate().is_ok());
        assert!(req.guest.attending);
        assert_eq!(req.friends.len(), 1);
        assert!(!req.friends[0].attending);
    }

    #[test]
    fn test_create_invitee_request_invalid_email() {
        let json = serde_json::json!({
            "email": "not-an-email",
            "self": { "first_name": "Ada", "last_name": "Lovelace" }
        });
        let req: CreateInviteeRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_invitee_request_nested_friend_invalid() {
        let json = serde_json::json!({
            "email": "ada@example.com",
            "self": { "first_name": "Ada", "last_name": "Lovelace" },
            "friends": [{ "first_name": "", "last_name": "Babbage" }]
        });
        let req: CreateInviteeRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_edit_invitee_request_empty_is_valid() {
        let req: EditInviteeRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.email.is_none());
        assert!(req.guest.is_none());
    }

    #[test]
    fn test_invitee_friend_serializes_self() {
        let friend = InviteeFriend {
            invitee_friend_id: Uuid::new_v4(),
            invitee_id: Uuid::new_v4(),
            guest: Guest {
                guest_id: Uuid::new_v4(),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                attending: true,
                menu_choices: vec![],
                menu_note: None,
            },
        };

        let json = serde_json::to_value(&friend).unwrap();
        assert_eq!(json["self"]["first_name"], "Grace");
    }
}
