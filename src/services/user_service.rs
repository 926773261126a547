use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::auth::{self, guard};
use crate::error::ApiError;
use crate::store::{NewUser, Store, User, UserFilter};

/// User business rules: duplicate-email conflicts, credential checks, and
/// the existence-before-ownership ordering on mutations.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn register(&self, mut new_user: NewUser) -> Result<User, ApiError> {
        if self
            .store
            .find_user_by_email(&new_user.email_address)
            .await?
            .is_some()
        {
            return Err(ApiError::Conflict("User already exists".into()));
        }
        new_user.password = hash_password(&new_user.password);
        let user = self.store.create_user(new_user).await?;
        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Same rejection for an unknown email and a wrong password, so callers
    /// cannot probe which addresses have accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), ApiError> {
        let user = match self.store.find_user_by_email(email).await? {
            Some(user) if user.password == hash_password(password) => user,
            _ => {
                tracing::warn!("failed login attempt for {email}");
                return Err(ApiError::InvalidCredentials);
            }
        };
        let token = auth::issue_token(user.id)?;
        Ok((token, user))
    }

    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, ApiError> {
        Ok(self.store.list_users(filter).await?)
    }

    pub async fn get_by_id(&self, id: u64) -> Result<User, ApiError> {
        self.store
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn update(
        &self,
        caller_id: u64,
        id: u64,
        mut update: NewUser,
    ) -> Result<User, ApiError> {
        // Existence before ownership: a nonexistent target must yield 404,
        // not 403, whoever asks.
        let existing = self.get_by_id(id).await?;
        guard::authorize(caller_id, existing.id, "update", "user")?;

        update.password = hash_password(&update.password);
        self.store
            .update_user(id, update)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, caller_id: u64, id: u64) -> Result<(), ApiError> {
        let existing = self.get_by_id(id).await?;
        guard::authorize(caller_id, existing.id, "delete", "user")?;

        if self.store.delete_user(id).await? {
            tracing::info!(user_id = id, "user deleted");
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}

fn not_found(id: u64) -> ApiError {
    ApiError::not_found(format!("User not found with id {id}."))
}

fn hash_password(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
