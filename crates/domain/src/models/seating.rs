//! Seating request domain models.
//!
//! Internally a seating request points at another invitee by id. Outward
//! facing shapes carry that id only as an opaque token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored "seat me near" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteeSeatingRequest {
    pub invitee_seating_request_id: Uuid,
    pub invitee_id: Uuid,
    pub invitee_request_id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

/// An invitee a seating request may point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatingTarget {
    pub invitee_id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

/// Candidate seating partner as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SeatingRequestChoice {
    pub invitee_request_id: String,
    pub first_name: String,
    pub last_name: String,
}

/// Seating request as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SeatingRequestInput {
    pub invitee_request_id: String,
}

/// Stored seating request as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SeatingRequestView {
    pub invitee_seating_request_id: Uuid,
    pub invitee_request_id: String,
    pub first_name: String,
    pub last_name: String,
}

/// Result of replacing an invitee's seating requests.
///
/// `dropped` lists submitted tokens that pointed at the requester itself and
/// were therefore not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SeatingRequestsResponse {
    pub data: Vec<SeatingRequestView>,
    pub dropped: Vec<String>,
}

/// What to do with a seating request that targets the requester.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfReferencePolicy {
    /// Discard the entry and report it in `dropped`.
    #[default]
    Drop,
    /// Fail the whole submission.
    Reject,
}
