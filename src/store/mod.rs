// Storage collaborator contract. The rest of the system only talks to the
// `Store` trait; the two backends (in-memory, MySQL) live in submodules.
pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    /// Stored as a hash; never serialized into responses.
    #[serde(skip_serializing)]
    pub password: String,
    pub phone_number: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
}

/// Registration/update payload after validation. The service layer hashes
/// the password before this reaches a store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub is_active: Option<bool>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserFilter {
    pub fn from_query(params: &std::collections::HashMap<String, String>) -> Self {
        Self {
            is_active: params.get("isActive").and_then(|v| v.parse().ok()),
            first_name: params.get("firstName").cloned(),
            last_name: params.get("lastName").cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub is_vega: bool,
    pub is_vegan: bool,
    pub is_to_take_home: bool,
    pub date_time: DateTime<Utc>,
    pub max_amount_of_participants: i64,
    pub price: f64,
    pub image_url: String,
    pub allergenes: Vec<String>,
    /// Identity of the user who created the meal; the ownership guard
    /// compares against this.
    pub cook_id: u64,
}

/// Meal create/update payload after validation, minus the cook identity
/// (which always comes from the verified token, never the body).
#[derive(Debug, Clone)]
pub struct MealData {
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub is_vega: bool,
    pub is_vegan: bool,
    pub is_to_take_home: bool,
    pub date_time: DateTime<Utc>,
    pub max_amount_of_participants: i64,
    pub price: f64,
    pub image_url: String,
    pub allergenes: Vec<String>,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: u64) -> Result<Option<User>, StoreError>;
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;
    async fn update_user(&self, id: u64, update: NewUser) -> Result<Option<User>, StoreError>;
    async fn delete_user(&self, id: u64) -> Result<bool, StoreError>;
    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError>;

    async fn create_meal(&self, cook_id: u64, data: MealData) -> Result<Meal, StoreError>;
    async fn find_meal_by_id(&self, id: u64) -> Result<Option<Meal>, StoreError>;
    async fn update_meal(&self, id: u64, data: MealData) -> Result<Option<Meal>, StoreError>;
    async fn delete_meal(&self, id: u64) -> Result<bool, StoreError>;
    async fn list_meals(&self) -> Result<Vec<Meal>, StoreError>;
}
