use serde_json::{json, Value};

use crate::middleware::ApiReply;

pub async fn root() -> ApiReply<Value> {
    ApiReply::ok("Hello World", json!({}))
}

/// GET /api/info - server identification
pub async fn info() -> ApiReply<Value> {
    ApiReply::ok(
        "Server info",
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Share a Meal REST API",
        }),
    )
}
