//! Invitee routes. Public: invitees reach them through their RSVP link.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    EditInviteeRequest, InviteeFriend, InviteeFriendRequest, InviteeResponse, MenuChoice,
    MenuChoiceInput, MenuNote, SeatingRequestInput, SeatingRequestsResponse, SetMenuNoteRequest,
};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_seating_requests_dropped;

/// GET /api/v1/invitees/:invitee_id
pub async fn get_invitee(
    State(state): State<AppState>,
    Path(invitee_id): Path<Uuid>,
) -> Result<Json<InviteeResponse>, ApiError> {
    Ok(Json(state.coordinator.get_invitee(invitee_id).await?))
}

/// PATCH /api/v1/invitees/:invitee_id
pub async fn edit_invitee(
    State(state): State<AppState>,
    Path(invitee_id): Path<Uuid>,
    Json(request): Json<EditInviteeRequest>,
) -> Result<Json<InviteeResponse>, ApiError> {
    request.validate()?;

    let invitee = state.coordinator.edit_invitee(invitee_id, &request).await?;
    Ok(Json(invitee))
}

/// POST /api/v1/invitees/:invitee_id/relationships/friends
pub async fn create_friend(
    State(state): State<AppState>,
    Path(invitee_id): Path<Uuid>,
    Json(request): Json<InviteeFriendRequest>,
) -> Result<(StatusCode, Json<InviteeFriend>), ApiError> {
    request.validate()?;

    let friend = state
        .coordinator
        .create_invitee_friend(invitee_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(friend)))
}

/// PATCH /api/v1/invitees/:invitee_id/relationships/friends/:friend_id
pub async fn edit_friend(
    State(state): State<AppState>,
    Path((invitee_id, friend_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<InviteeFriendRequest>,
) -> Result<Json<InviteeFriend>, ApiError> {
    request.validate()?;

    let friend = state
        .coordinator
        .edit_invitee_friend(invitee_id, friend_id, &request)
        .await?;
    Ok(Json(friend))
}

/// Replaces the invitee's own menu choices. The body is the full list.
///
/// POST /api/v1/invitees/:invitee_id/relationships/menu_choices
pub async fn set_menu_choices(
    State(state): State<AppState>,
    Path(invitee_id): Path<Uuid>,
    Json(choices): Json<Vec<MenuChoiceInput>>,
) -> Result<Json<Vec<MenuChoice>>, ApiError> {
    let stored = state
        .coordinator
        .set_invitee_menu_choices(invitee_id, &choices)
        .await?;
    Ok(Json(stored))
}

/// POST /api/v1/invitees/:invitee_id/relationships/friends/:friend_id/relationships/menu_choices
pub async fn set_friend_menu_choices(
    State(state): State<AppState>,
    Path((invitee_id, friend_id)): Path<(Uuid, Uuid)>,
    Json(choices): Json<Vec<MenuChoiceInput>>,
) -> Result<Json<Vec<MenuChoice>>, ApiError> {
    let stored = state
        .coordinator
        .set_invitee_friend_menu_choices(invitee_id, friend_id, &choices)
        .await?;
    Ok(Json(stored))
}

/// POST /api/v1/invitees/:invitee_id/relationships/menu_note
pub async fn set_menu_note(
    State(state): State<AppState>,
    Path(invitee_id): Path<Uuid>,
    Json(request): Json<SetMenuNoteRequest>,
) -> Result<Json<MenuNote>, ApiError> {
    request.validate()?;

    let note = state
        .coordinator
        .set_invitee_menu_note(invitee_id, &request.note_body)
        .await?;
    Ok(Json(note))
}

/// POST /api/v1/invitees/:invitee_id/relationships/friends/:friend_id/relationships/menu_note
pub async fn set_friend_menu_note(
    State(state): State<AppState>,
    Path((invitee_id, friend_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<SetMenuNoteRequest>,
) -> Result<Json<MenuNote>, ApiError> {
    request.validate()?;

    let note = state
        .coordinator
        .set_invitee_friend_menu_note(invitee_id, friend_id, &request.note_body)
        .await?;
    Ok(Json(note))
}

/// Replaces the invitee's seating requests. Targets are seating tokens as
/// handed out by the seating request choices listing.
///
/// POST /api/v1/invitees/:invitee_id/relationships/seating_requests
pub async fn set_seating_requests(
    State(state): State<AppState>,
    Path(invitee_id): Path<Uuid>,
    Json(requests): Json<Vec<SeatingRequestInput>>,
) -> Result<Json<SeatingRequestsResponse>, ApiError> {
    let response = state
        .coordinator
        .set_invitee_seating_requests(invitee_id, &requests)
        .await?;
    record_seating_requests_dropped(response.dropped.len());
    Ok(Json(response))
}
