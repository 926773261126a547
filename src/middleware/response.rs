use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wrapper for successful responses that produces the uniform
/// `{status, message, data}` envelope. Failures take the `ApiError` path;
/// between the two, every response the server sends has this shape.
#[derive(Debug)]
pub struct ApiReply<T: Serialize> {
    status: StatusCode,
    message: String,
    data: T,
}

impl<T: Serialize> ApiReply<T> {
    /// 200 OK
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data,
        }
    }

    /// 201 Created
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: message.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiReply<T> {
    fn into_response(self) -> Response {
        let data = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize response data: {e}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "status": 500,
                        "message": "Internal Server Error",
                        "data": {},
                    })),
                )
                    .into_response();
            }
        };

        let body = json!({
            "status": self.status.as_u16(),
            "message": self.message,
            "data": data,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Result alias used by every handler: success envelope or translated error.
pub type ApiResult<T> = Result<ApiReply<T>, crate::error::ApiError>;
