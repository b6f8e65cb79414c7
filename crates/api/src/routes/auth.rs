//! Organizer token routes.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{LoginRequest, TokenResponse};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::services::AuthService;

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(state.coordinator.gateway().clone(), state.jwt.clone())
}

/// Exchange email and password for a token.
///
/// POST /api/v1/token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    request.validate()?;

    let response = auth_service(&state)
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(response))
}

/// Issue a fresh token for the current organizer.
///
/// GET /api/v1/token
pub async fn refresh(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<TokenResponse>, ApiError> {
    let response = auth_service(&state).refresh(user.user_id).await?;
    Ok(Json(response))
}

/// Tokens are stateless; logging out only requires a valid token.
///
/// DELETE /api/v1/token
pub async fn logout(user: AuthUser) -> StatusCode {
    info!(user_id = %user.user_id, jti = %user.jti, "User logged out");
    StatusCode::NO_CONTENT
}
