//! Authenticated organizer extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::{bearer_token, UserAuth};

/// The organizer making the request.
///
/// Uses what `require_user_auth` stored in the request extensions, or
/// validates the bearer token itself on routes without the middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub jti: String,
}

impl From<UserAuth> for AuthUser {
    fn from(auth: UserAuth) -> Self {
        Self {
            user_id: auth.user_id,
            jti: auth.jti,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuth>() {
            return Ok(auth.clone().into());
        }

        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        UserAuth::validate(&state.jwt, token)
            .map(Into::into)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))
    }
}
