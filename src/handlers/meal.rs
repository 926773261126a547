use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiReply, ApiResult, AuthUser};
use crate::server::AppState;
use crate::store::{Meal, MealData};
use crate::validation;

/// Validated meal payload as sent by the client. The cook identity never
/// comes from the body; it is taken from the verified token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MealPayload {
    name: String,
    description: String,
    is_active: bool,
    is_vega: bool,
    is_vegan: bool,
    is_to_take_home: bool,
    date_time: String,
    max_amount_of_participants: f64,
    price: f64,
    image_url: String,
    allergenes: Vec<String>,
}

/// POST /api/meal - create a meal owned by the caller.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    body: Option<Json<Value>>,
) -> ApiResult<Meal> {
    let data = validated_meal_data(body)?;
    let meal = state.meals.create(auth.user_id, data).await?;
    Ok(ApiReply::created("Meal created successfully", meal))
}

/// GET /api/meal (public)
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Meal>> {
    let meals = state.meals.list().await?;
    Ok(ApiReply::ok("All meals retrieved successfully", meals))
}

/// GET /api/meal/:mealId (public)
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(meal_id): Path<String>,
) -> ApiResult<Meal> {
    let id = parse_id(&meal_id)?;
    let meal = state.meals.get_by_id(id).await?;
    Ok(ApiReply::ok(
        format!("Meal with ID {id} retrieved successfully"),
        meal,
    ))
}

/// PUT /api/meal/:mealId - only the cook may update their meal.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(meal_id): Path<String>,
    body: Option<Json<Value>>,
) -> ApiResult<Meal> {
    let id = parse_id(&meal_id)?;
    let data = validated_meal_data(body)?;
    let meal = state.meals.update(auth.user_id, id, data).await?;
    Ok(ApiReply::ok("Meal successfully updated", meal))
}

/// DELETE /api/meal/:mealId - only the cook may delete their meal.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(meal_id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&meal_id)?;
    state.meals.delete(auth.user_id, id).await?;
    Ok(ApiReply::ok("Meal successfully deleted", json!({})))
}

fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation("Invalid meal id"))
}

fn validated_meal_data(body: Option<Json<Value>>) -> Result<MealData, ApiError> {
    let Json(body) = body.unwrap_or(Json(Value::Null));
    validation::meal(&body)?;

    let payload: MealPayload = serde_json::from_value(body)
        .map_err(|e| ApiError::internal(format!("validated meal payload failed to decode: {e}")))?;
    let date_time = validation::parse_date_time(&payload.date_time)
        .ok_or_else(|| ApiError::validation("Invalid dateTime"))?;

    Ok(MealData {
        name: payload.name,
        description: payload.description,
        is_active: payload.is_active,
        is_vega: payload.is_vega,
        is_vegan: payload.is_vegan,
        is_to_take_home: payload.is_to_take_home,
        date_time,
        max_amount_of_participants: payload.max_amount_of_participants as i64,
        price: payload.price,
        image_url: payload.image_url,
        allergenes: payload.allergenes,
    })
}
