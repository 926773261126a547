use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::middleware::{ApiReply, ApiResult};
use crate::server::AppState;
use crate::validation;

/// POST /api/login - verify credentials and hand out a bearer token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Option<Json<Value>>,
) -> ApiResult<Value> {
    let Json(body) = body.unwrap_or(Json(Value::Null));
    validation::login(&body)?;

    let email = body["emailAddress"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let (token, user) = state.users.login(email, password).await?;
    Ok(ApiReply::ok(
        "User successfully logged in",
        json!({ "token": token, "user": user }),
    ))
}
