use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::{CoordinatorError, GatewayError};
use serde::Serialize;
use thiserror::Error;

use crate::middleware::metrics::record_menu_choices_rejected;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Validation failure without field details.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                (!details.is_empty()).then_some(details),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(what) => ApiError::NotFound(format!("{what} not found")),
            GatewayError::Conflict(_) => ApiError::Conflict("Resource already exists".into()),
            GatewayError::Database(msg) => ApiError::Internal(format!("Database error: {msg}")),
        }
    }
}

impl From<CoordinatorError> for ApiError {
    fn from(err: CoordinatorError) -> Self {
        match err {
            CoordinatorError::InvalidMenuChoices(ref violation) => {
                record_menu_choices_rejected(violation.kind());
                let detail = ValidationDetail {
                    field: format!("menu_choices[{}]", violation.index()),
                    message: violation.to_string(),
                };
                ApiError::Validation {
                    message: err.to_string(),
                    details: vec![detail],
                }
            }
            CoordinatorError::SelfReference { ref token } => {
                let detail = ValidationDetail {
                    field: "invitee_request_id".to_string(),
                    message: format!("{token} refers to the requesting invitee"),
                };
                ApiError::Validation {
                    message: err.to_string(),
                    details: vec![detail],
                }
            }
            CoordinatorError::ForeignSeatingTarget { ref token } => {
                let detail = ValidationDetail {
                    field: "invitee_request_id".to_string(),
                    message: format!("{token} is not an invitee of this event"),
                };
                ApiError::Validation {
                    message: err.to_string(),
                    details: vec![detail],
                }
            }
            CoordinatorError::FriendLimitReached { .. } => ApiError::validation(err.to_string()),
            CoordinatorError::NotFound(what) => ApiError::NotFound(format!("{what} not found")),
            CoordinatorError::Forbidden => ApiError::Forbidden(err.to_string()),
            CoordinatorError::Codec(e) => ApiError::Internal(format!("Seating token failure: {e}")),
            CoordinatorError::Gateway(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();

        // Nested struct and list errors are not part of field_errors().
        if details.is_empty() {
            details.push(ValidationDetail {
                field: "body".to_string(),
                message: errors.to_string(),
            });
        }
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let message = if details.len() == 1 {
            details[0].message.clone()
        } else {
            format!("{} validation errors", details.len())
        };

        ApiError::Validation { message, details }
    }
}
