// HTTP API error types and the single translation point to the response
// envelope. Handlers and services never write to the response on failure;
// they return an `ApiError` and the `IntoResponse` impl below produces the
// uniform `{status, message, data}` shape.
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    // 401 Unauthorized - Authorization header absent
    #[error("No token provided!")]
    NoToken,

    // 401 Unauthorized - header present but token malformed/expired/tampered
    #[error("Token invalid!")]
    InvalidToken,

    // 401 Unauthorized - login with unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    // 400 Bad Request
    #[error("{0}")]
    ValidationFailed(String),

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 409 Conflict
    #[error("{0}")]
    Conflict(String),

    // 500 Internal Server Error - the cause is logged, never sent to clients
    #[error("Internal Server Error")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NoToken => 401,
            ApiError::InvalidToken => 401,
            ApiError::InvalidCredentials => 401,
            ApiError::ValidationFailed(_) => 400,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::Internal(_) => 500,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::ValidationFailed(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(cause: impl Into<String>) -> Self {
        ApiError::Internal(cause.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Unknown(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Internal(cause) = &self {
            tracing::error!("internal error: {cause}");
        }
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "status": self.status_code(),
            "message": self.to_string(),
            "data": {},
        });
        (status, Json(body)).into_response()
    }
}
