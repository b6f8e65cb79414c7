//! Organizer login and token refresh.

use std::sync::Arc;

use domain::models::TokenResponse;
use domain::services::{GatewayError, InvitationGateway};
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{verify_password, PasswordError};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Gateway(GatewayError),
}

impl From<GatewayError> for AuthError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(_) => AuthError::UserNotFound,
            other => AuthError::Gateway(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::UserNotFound => {
                ApiError::Unauthorized("Authentication failed".to_string())
            }
            AuthError::Token(e) => ApiError::Internal(format!("Token error: {e}")),
            AuthError::Password(e) => ApiError::Internal(format!("Password error: {e}")),
            AuthError::Gateway(e) => e.into(),
        }
    }
}

/// Issues organizer tokens.
pub struct AuthService {
    gateway: Arc<dyn InvitationGateway>,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(gateway: Arc<dyn InvitationGateway>, jwt: Arc<JwtConfig>) -> Self {
        Self { gateway, jwt }
    }

    /// Checks an email/password pair and returns a fresh token.
    ///
    /// Unknown emails and wrong passwords fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let email = email.trim().to_lowercase();

        let Some(credentials) = self.gateway.find_user_by_email(&email).await? else {
            warn!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &credentials.password_hash)? {
            warn!(user_id = %credentials.user.user_id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %credentials.user.user_id, "User logged in");
        self.issue(credentials.user.user_id)
    }

    /// Issues a new token for an already authenticated user.
    pub async fn refresh(&self, user_id: Uuid) -> Result<TokenResponse, AuthError> {
        let user = self.gateway.get_user(user_id).await?;
        self.issue(user.user_id)
    }

    fn issue(&self, user_id: Uuid) -> Result<TokenResponse, AuthError> {
        let (token, _jti) = self.jwt.generate_token(user_id)?;
        Ok(TokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.token_expiry_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::services::InMemoryGateway;
    use shared::password::hash_password;

    async fn service_with_user(password: &str) -> (AuthService, Uuid, Arc<JwtConfig>) {
        let gateway = InMemoryGateway::new();
        let hash = hash_password(password).unwrap();
        let user = gateway
            .insert_user("Organizer@Example.com", &hash, "Olive", "Organizer")
            .await;
        let jwt = Arc::new(JwtConfig::new("auth-service-test", 3600).unwrap());
        let service = AuthService::new(Arc::new(gateway), jwt.clone());
        (service, user.user_id, jwt)
    }

    #[tokio::test]
    async fn test_login_success_ignores_email_case() {
        let (service, user_id, jwt) = service_with_user("correct horse").await;

        let response = service
            .login("  ORGANIZER@example.com ", "correct horse")
            .await
            .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);
        let claims = jwt.validate_token(&response.token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (service, _, _) = service_with_user("correct horse").await;
        let err = service
            .login("organizer@example.com", "battery staple")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let (service, _, _) = service_with_user("correct horse").await;
        let err = service
            .login("nobody@example.com", "correct horse")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_refresh_unknown_user() {
        let (service, _, _) = service_with_user("pw").await;
        let err = service.refresh(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
        assert!(matches!(ApiError::from(err), ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_refresh_issues_new_token() {
        let (service, user_id, jwt) = service_with_user("pw").await;
        let response = service.refresh(user_id).await.unwrap();
        let claims = jwt.validate_token(&response.token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
    }
}
