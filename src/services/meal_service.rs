use std::sync::Arc;

use crate::auth::guard;
use crate::error::ApiError;
use crate::store::{Meal, MealData, Store};

/// Meal business rules: only the cook who created a meal may change or
/// delete it, and existence is checked before ownership.
#[derive(Clone)]
pub struct MealService {
    store: Arc<dyn Store>,
}

impl MealService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, cook_id: u64, data: MealData) -> Result<Meal, ApiError> {
        let meal = self.store.create_meal(cook_id, data).await?;
        tracing::info!(meal_id = meal.id, cook_id, "meal created");
        Ok(meal)
    }

    pub async fn list(&self) -> Result<Vec<Meal>, ApiError> {
        Ok(self.store.list_meals().await?)
    }

    pub async fn get_by_id(&self, id: u64) -> Result<Meal, ApiError> {
        self.store
            .find_meal_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn update(
        &self,
        caller_id: u64,
        id: u64,
        data: MealData,
    ) -> Result<Meal, ApiError> {
        let existing = self.get_by_id(id).await?;
        guard::authorize(caller_id, existing.cook_id, "update", "meal")?;

        self.store
            .update_meal(id, data)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, caller_id: u64, id: u64) -> Result<(), ApiError> {
        let existing = self.get_by_id(id).await?;
        guard::authorize(caller_id, existing.cook_id, "delete", "meal")?;

        if self.store.delete_meal(id).await? {
            tracing::info!(meal_id = id, "meal deleted");
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

fn not_found(id: u64) -> ApiError {
    ApiError::not_found(format!("Meal with ID {id} not found"))
}
