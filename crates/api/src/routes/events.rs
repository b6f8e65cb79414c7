//! Event routes: event details, menus, invitee administration and seating
//! candidates.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    CreateEventRequest, CreateInviteeRequest, CreateMenuItemRequest, Event, EventStats,
    InviteeResponse, ListInviteesResponse, MenuItem, SeatingRequestChoice,
};
use serde::Deserialize;
use shared::pagination::Pagination;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthUser;

/// `page[number]` and `page[size]` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "page[number]")]
    pub number: Option<u32>,
    #[serde(rename = "page[size]")]
    pub size: Option<u32>,
}

/// GET /api/v1/events
pub async fn list_events(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = state.coordinator.get_events(user.user_id).await?;
    Ok(Json(events))
}

/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    request.validate()?;

    let event = state
        .coordinator
        .create_event(user.user_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/v1/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.coordinator.get_event_info(event_id).await?))
}

/// GET /api/v1/events/:event_id/stats
pub async fn get_event_stats(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    user: AuthUser,
) -> Result<Json<EventStats>, ApiError> {
    let stats = state
        .coordinator
        .get_event_stats(event_id, user.user_id)
        .await?;
    Ok(Json(stats))
}

/// GET /api/v1/events/:event_id/relationships/menu_items
pub async fn get_menu_items(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    let items = state.coordinator.get_menu_items_for_event(event_id).await?;
    Ok(Json(items))
}

/// POST /api/v1/events/:event_id/relationships/menu_items
pub async fn create_menu_item(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    user: AuthUser,
    Json(request): Json<CreateMenuItemRequest>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    request.validate()?;

    let item = state
        .coordinator
        .create_menu_item(event_id, user.user_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/v1/events/:event_id/relationships/seating_request_choices
pub async fn get_seating_request_choices(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<SeatingRequestChoice>>, ApiError> {
    let choices = state
        .coordinator
        .get_list_of_seating_request_choices(event_id)
        .await?;
    Ok(Json(choices))
}

/// GET /api/v1/events/:event_id/relationships/invitees
pub async fn list_invitees(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
    user: AuthUser,
) -> Result<Json<ListInviteesResponse>, ApiError> {
    let pagination = Pagination::new(page.number, page.size);
    let response = state
        .coordinator
        .get_invitees_for_event(event_id, user.user_id, pagination)
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/events/:event_id/relationships/invitees
pub async fn create_invitee(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    user: AuthUser,
    Json(request): Json<CreateInviteeRequest>,
) -> Result<(StatusCode, Json<InviteeResponse>), ApiError> {
    request.validate()?;

    let invitee = state
        .coordinator
        .create_invitee_for_event(event_id, user.user_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(invitee)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_bracket_names() {
        let query: PageQuery =
            parse_query("page%5Bnumber%5D=3&page%5Bsize%5D=20").unwrap();
        assert_eq!(query.number, Some(3));
        assert_eq!(query.size, Some(20));
    }

    #[test]
    fn test_page_query_optional() {
        let query: PageQuery = parse_query("").unwrap();
        assert_eq!(query.number, None);
        assert_eq!(query.size, None);
    }

    fn parse_query(raw: &str) -> Result<PageQuery, String> {
        let uri: axum::http::Uri = format!("/?{raw}").parse().map_err(|e| format!("{e}"))?;
        Query::<PageQuery>::try_from_uri(&uri)
            .map(|Query(q)| q)
            .map_err(|e| e.to_string())
    }
}
