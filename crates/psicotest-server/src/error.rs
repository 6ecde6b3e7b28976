use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use psicotest_auth::error::AuthError;
use psicotest_core::error::CoreError;
use psicotest_instruments::error::InterpretError;
use psicotest_storage::error::StorageError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::EmailTaken(_) => ApiError::Conflict("email already registered".to_string()),
            StorageError::SlugTaken(slug) => ApiError::Conflict(format!("slug already in use: {slug}")),
            StorageError::BuiltInTest(slug) => {
                ApiError::Conflict(format!("built-in instrument cannot be edited: {slug}"))
            }
            StorageError::Core(e) => e.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::TokenExpired => ApiError::Unauthorized("token expired".to_string()),
            AuthError::InvalidToken(_) | AuthError::Jwt(_) => {
                ApiError::Unauthorized("invalid token".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<InterpretError> for ApiError {
    fn from(e: InterpretError) -> Self {
        ApiError::Internal(e.to_string())
    }
}
