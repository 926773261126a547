use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::error::ApiError;

/// Authenticated caller context extracted from a verified token. Attached to
/// the request extensions for downstream handlers; lives for one request.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub user_id: u64,
}

/// Bearer-token middleware for protected routes. A missing header and a
/// present-but-invalid token are distinct failures with distinct messages;
/// both short-circuit to the error translator with 401.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers)?;
    let claims = auth::verify_token(&token)?;
    tracing::debug!(user_id = claims.user_id, "token is valid");

    request.extensions_mut().insert(AuthUser {
        user_id: claims.user_id,
    });
    Ok(next.run(request).await)
}

/// The token is whatever follows the 7-character `Bearer ` prefix.
fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers.get("authorization").ok_or(ApiError::NoToken)?;
    let auth_str = auth_header.to_str().map_err(|_| ApiError::InvalidToken)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        _ => Err(ApiError::InvalidToken),
    }
}
