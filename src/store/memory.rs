// In-memory store, used for development and tests. Request tasks share it
// behind an async RwLock; state does not survive a restart.
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Meal, MealData, NewUser, Store, StoreError, User, UserFilter};

#[derive(Default)]
struct Inner {
    users: BTreeMap<u64, User>,
    meals: BTreeMap<u64, Meal>,
    next_user_id: u64,
    next_meal_id: u64,
}

pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_user_id: 1,
                next_meal_id: 1,
                ..Inner::default()
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.email_address == email)
            .cloned())
    }

    async fn find_user_by_id(&self, id: u64) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .users
            .values()
            .any(|u| u.email_address == new_user.email_address)
        {
            return Err(StoreError::Conflict("User already exists".into()));
        }
        let id = inner.next_user_id;
        inner.next_user_id += 1;
        let user = User {
            id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email_address: new_user.email_address,
            password: new_user.password,
            phone_number: new_user.phone_number,
            street: new_user.street,
            city: new_user.city,
            is_active: true,
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: u64, update: NewUser) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.first_name = update.first_name;
                user.last_name = update.last_name;
                user.email_address = update.email_address;
                user.password = update.password;
                user.phone_number = update.phone_number;
                user.street = update.street;
                user.city = update.city;
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_user(&self, id: u64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.remove(&id).is_some())
    }

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .filter(|u| filter.is_active.map_or(true, |v| u.is_active == v))
            .filter(|u| filter.first_name.as_ref().map_or(true, |v| &u.first_name == v))
            .filter(|u| filter.last_name.as_ref().map_or(true, |v| &u.last_name == v))
            .cloned()
            .collect())
    }

    async fn create_meal(&self, cook_id: u64, data: MealData) -> Result<Meal, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_meal_id;
        inner.next_meal_id += 1;
        let meal = Meal {
            id,
            name: data.name,
            description: data.description,
            is_active: data.is_active,
            is_vega: data.is_vega,
            is_vegan: data.is_vegan,
            is_to_take_home: data.is_to_take_home,
            date_time: data.date_time,
            max_amount_of_participants: data.max_amount_of_participants,
            price: data.price,
            image_url: data.image_url,
            allergenes: data.allergenes,
            cook_id,
        };
        inner.meals.insert(id, meal.clone());
        Ok(meal)
    }

    async fn find_meal_by_id(&self, id: u64) -> Result<Option<Meal>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.meals.get(&id).cloned())
    }

    async fn update_meal(&self, id: u64, data: MealData) -> Result<Option<Meal>, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.meals.get_mut(&id) {
            Some(meal) => {
                meal.name = data.name;
                meal.description = data.description;
                meal.is_active = data.is_active;
                meal.is_vega = data.is_vega;
                meal.is_vegan = data.is_vegan;
                meal.is_to_take_home = data.is_to_take_home;
                meal.date_time = data.date_time;
                meal.max_amount_of_participants = data.max_amount_of_participants;
                meal.price = data.price;
                meal.image_url = data.image_url;
                meal.allergenes = data.allergenes.clone();
                Ok(Some(meal.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_meal(&self, id: u64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.meals.remove(&id).is_some())
    }

    async fn list_meals(&self) -> Result<Vec<Meal>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.meals.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email_address: email.into(),
            password: "hashed".into(),
            phone_number: None,
            street: None,
            city: None,
        }
    }

    fn meal_data(name: &str) -> MealData {
        MealData {
            name: name.into(),
            description: "test meal".into(),
            is_active: true,
            is_vega: false,
            is_vegan: false,
            is_to_take_home: true,
            date_time: Utc::now(),
            max_amount_of_participants: 4,
            price: 5.50,
            image_url: "https://example.com/meal.jpg".into(),
            allergenes: vec!["gluten".into()],
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let store = MemoryStore::new();
        let a = store.create_user(new_user("a@server.com")).await.unwrap();
        let b = store.create_user(new_user("b@server.com")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@server.com")).await.unwrap();
        let err = store.create_user(new_user("a@server.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let store = MemoryStore::new();
        assert!(store.update_user(9, new_user("x@server.com")).await.unwrap().is_none());
        assert!(!store.delete_user(9).await.unwrap());
    }

    #[tokio::test]
    async fn list_users_applies_filters() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@server.com")).await.unwrap();
        let mut other = new_user("b@server.com");
        other.first_name = "Jane".into();
        store.create_user(other).await.unwrap();

        let filter = UserFilter {
            first_name: Some("Jane".into()),
            ..UserFilter::default()
        };
        let users = store.list_users(&filter).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email_address, "b@server.com");

        let active = UserFilter {
            is_active: Some(true),
            ..UserFilter::default()
        };
        assert_eq!(store.list_users(&active).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn meals_keep_their_cook() {
        let store = MemoryStore::new();
        let meal = store.create_meal(6, meal_data("Soup")).await.unwrap();
        assert_eq!(meal.cook_id, 6);
        let found = store.find_meal_by_id(meal.id).await.unwrap().unwrap();
        assert_eq!(found.cook_id, 6);
        assert!(store.delete_meal(meal.id).await.unwrap());
        assert!(store.find_meal_by_id(meal.id).await.unwrap().is_none());
    }
}
