// Router assembly. Per-route middleware ordering implements the request
// pipeline: bearer-token verification runs before the handler on protected
// methods, payload validation runs at handler entry, and ownership checks
// run in the services right before the store call. Any failure
// short-circuits into the `ApiError` translator.
use std::sync::Arc;

use axum::{
    handler::Handler,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::handlers::{auth, info, meal, user};
use crate::middleware::jwt_auth_middleware;
use crate::services::{MealService, UserService};
use crate::store::Store;

pub struct AppState {
    pub users: UserService,
    pub meals: MealService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Arc<Self> {
        Arc::new(Self {
            users: UserService::new(store.clone()),
            meals: MealService::new(store),
        })
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(info::root))
        .route("/api/info", get(info::info))
        .route("/api/login", post(auth::login))
        .route(
            "/api/user",
            post(user::register).get(user::list.layer(from_fn(jwt_auth_middleware))),
        )
        .route(
            "/api/user/profile",
            get(user::profile.layer(from_fn(jwt_auth_middleware))),
        )
        .route(
            "/api/user/:user_id",
            get(user::get_by_id.layer(from_fn(jwt_auth_middleware)))
                .put(user::update.layer(from_fn(jwt_auth_middleware)))
                .delete(user::remove.layer(from_fn(jwt_auth_middleware))),
        )
        .route(
            "/api/meal",
            post(meal::create.layer(from_fn(jwt_auth_middleware))).get(meal::list),
        )
        .route(
            "/api/meal/:meal_id",
            get(meal::get_by_id)
                .put(meal::update.layer(from_fn(jwt_auth_middleware)))
                .delete(meal::remove.layer(from_fn(jwt_auth_middleware))),
        )
        .fallback(route_not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Unmatched method+path never enters the authentication stage; it maps
/// straight to a normalized 404.
async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
