//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Handler: Result<_, ApiError>                                           │
//! │       │                                                                 │
//! │       ├── ValidationError ─────────────► 400  message shown as-is       │
//! │       ├── CoreError::InvalidCredentials ► 401                           │
//! │       ├── CoreError::PermissionDenied ──► 403                           │
//! │       ├── DbError::NotFound ────────────► 404  "<Entity> not found"     │
//! │       ├── DbError::UniqueViolation ─────► 409                           │
//! │       └── DbError (anything else) ──────► 500  logged, generic message  │
//! │                                                                         │
//! │  Body: { "success": false, "data": null, "message": "..." }             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage detail is logged with `tracing::error!` and never sent to the
//! client.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use stock_core::{CoreError, ValidationError};
use stock_db::DbError;

use crate::response::ApiResponse;

/// API error returned from handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status sent to the client
    pub status: StatusCode,

    /// Human-readable message placed in the envelope
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    /// 400
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, message)
    }

    /// 401
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::UNAUTHORIZED, message)
    }

    /// 403
    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::FORBIDDEN, message)
    }

    /// 404
    pub fn not_found(entity: &str) -> Self {
        ApiError::new(StatusCode::NOT_FOUND, format!("{} not found", entity))
    }

    /// 409
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::CONFLICT, message)
    }

    /// 500
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body: ApiResponse<()> = ApiResponse::failure(self.message);
        (self.status, Json(body)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } => ApiError::not_found(&entity),
            DbError::Validation(e) => ApiError::from(e),
            DbError::UniqueViolation { field, .. } => {
                ApiError::conflict(format!("{} already exists", field))
            }
            DbError::CheckViolation { message } => {
                tracing::warn!("Check constraint rejected write: {}", message);
                ApiError::validation("Value out of range")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Service busy, retry later")
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!("Database operation failed: {}", other);
                ApiError::internal("Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            CoreError::PermissionDenied { .. } => ApiError::forbidden(err.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected JSON body");
        ApiError::validation("Invalid request format")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected query string");
        ApiError::validation("Invalid query string")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_hides_id() {
        let err: ApiError = DbError::not_found("User", 99).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "User not found");
    }

    #[test]
    fn test_storage_detail_not_leaked() {
        let err: ApiError =
            DbError::QueryFailed("relation \"products\" does not exist".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                ValidationError::Required {
                    field: "name".to_string(),
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                DbError::Validation(ValidationError::MustBePositive {
                    field: "price".to_string(),
                })
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (CoreError::InvalidCredentials.into(), StatusCode::UNAUTHORIZED),
            (
                CoreError::PermissionDenied {
                    required: "admin".to_string(),
                }
                .into(),
                StatusCode::FORBIDDEN,
            ),
            (
                DbError::duplicate("email", "a@b.test").into(),
                StatusCode::CONFLICT,
            ),
            (
                DbError::PoolExhausted.into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.status, status, "{}", err);
        }
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::forbidden("Admins only").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
