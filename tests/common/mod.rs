#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use share_a_meal_api::server::{app, AppState};
use share_a_meal_api::store::memory::MemoryStore;

/// Fresh router over an empty in-memory store.
pub fn test_app() -> Router {
    app(AppState::new(Arc::new(MemoryStore::new())))
}

/// Drive one request through the router and decode the envelope.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub fn registration(email: &str) -> Value {
    json!({
        "emailAddress": email,
        "firstName": "John",
        "lastName": "Doe",
        "password": "secret123",
    })
}

pub fn meal_payload(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Home cooked",
        "isActive": true,
        "isVega": false,
        "isVegan": false,
        "isToTakeHome": true,
        "dateTime": "2026-09-01T17:30:00",
        "maxAmountOfParticipants": 6,
        "price": 6.75,
        "imageUrl": "https://example.com/meal.jpg",
        "allergenes": ["gluten"],
    })
}

/// Register a user and log in, returning its id and a fresh bearer token.
pub async fn register_and_login(app: &Router, email: &str) -> (u64, String) {
    let (status, body) = send(app, Method::POST, "/api/user", None, Some(registration(email))).await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
    let id = body["data"]["id"].as_u64().unwrap();

    let (status, body) = send(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "emailAddress": email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    let token = body["data"]["token"].as_str().unwrap().to_string();
    (id, token)
}
