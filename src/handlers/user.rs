use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiReply, ApiResult, AuthUser};
use crate::server::AppState;
use crate::store::{NewUser, User, UserFilter};
use crate::validation;

/// POST /api/user - register a new user (public).
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Option<Json<Value>>,
) -> ApiResult<User> {
    let Json(body) = body.unwrap_or(Json(Value::Null));
    validation::register(&body)?;

    let new_user = deserialize_user(body)?;
    let user = state.users.register(new_user).await?;
    Ok(ApiReply::created(
        format!("User created with id {}.", user.id),
        user,
    ))
}

/// GET /api/user - list users, optionally filtered on query parameters.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<User>> {
    let filter = UserFilter::from_query(&params);
    let users = state.users.list(&filter).await?;
    Ok(ApiReply::ok(format!("Found {} users.", users.len()), users))
}

/// GET /api/user/profile - the caller's own record.
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<User> {
    let user = state.users.get_by_id(auth.user_id).await?;
    Ok(ApiReply::ok(
        format!("Found user with id {}.", user.id),
        user,
    ))
}

/// GET /api/user/:userId
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<User> {
    let id = parse_id(&user_id)?;
    let user = state.users.get_by_id(id).await?;
    Ok(ApiReply::ok(format!("Found user with id {id}."), user))
}

/// PUT /api/user/:userId - full update of the caller's own record.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
    body: Option<Json<Value>>,
) -> ApiResult<User> {
    let id = parse_id(&user_id)?;
    let Json(body) = body.unwrap_or(Json(Value::Null));
    validation::register(&body)?;

    let update = deserialize_user(body)?;
    let user = state.users.update(auth.user_id, id, update).await?;
    Ok(ApiReply::ok("User successfully updated", user))
}

/// DELETE /api/user/:userId - only the owner may delete their record.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&user_id)?;
    state.users.delete(auth.user_id, id).await?;
    Ok(ApiReply::ok("User successfully deleted", json!({})))
}

fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation("Invalid user id"))
}

// The payload was validated against the registration schema, so a
// deserialization failure here is a programming error, not client input.
fn deserialize_user(body: Value) -> Result<NewUser, ApiError> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::internal(format!("validated user payload failed to decode: {e}")))
}
