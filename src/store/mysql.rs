// MySQL-backed store. Schema lives in `schema.sql` at the repository root;
// all queries are parameterized and `allergenes` is stored as a
// comma-separated string.
use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeZone, Utc};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{MySql, QueryBuilder, Row};

use crate::config;

use super::{Meal, MealData, NewUser, Store, StoreError, User, UserFilter};

const USER_COLUMNS: &str =
    "id, firstName, lastName, emailAddress, password, phoneNumber, street, city, isActive";
const MEAL_COLUMNS: &str = "id, name, description, isActive, isVega, isVegan, isToTakeHome, \
     dateTime, maxAmountOfParticipants, price, imageUrl, allergenes, cookId";

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config::config().database.max_connections)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound("record not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict("User already exists".into())
            }
            _ => {
                tracing::error!("store query failed: {err}");
                StoreError::Unknown(err.to_string())
            }
        }
    }
}

fn user_from_row(row: &MySqlRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        first_name: row.try_get("firstName")?,
        last_name: row.try_get("lastName")?,
        email_address: row.try_get("emailAddress")?,
        password: row.try_get("password")?,
        phone_number: row.try_get("phoneNumber")?,
        street: row.try_get("street")?,
        city: row.try_get("city")?,
        is_active: row.try_get("isActive")?,
    })
}

fn meal_from_row(row: &MySqlRow) -> Result<Meal, sqlx::Error> {
    let date_time: NaiveDateTime = row.try_get("dateTime")?;
    let allergenes: String = row.try_get("allergenes")?;
    Ok(Meal {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        is_active: row.try_get("isActive")?,
        is_vega: row.try_get("isVega")?,
        is_vegan: row.try_get("isVegan")?,
        is_to_take_home: row.try_get("isToTakeHome")?,
        date_time: Utc.from_utc_datetime(&date_time),
        max_amount_of_participants: row.try_get("maxAmountOfParticipants")?,
        price: row.try_get("price")?,
        image_url: row.try_get("imageUrl")?,
        allergenes: split_allergenes(&allergenes),
        cook_id: row.try_get("cookId")?,
    })
}

fn split_allergenes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_allergenes(items: &[String]) -> String {
    items.join(",")
}

#[async_trait]
impl Store for MySqlStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM user WHERE emailAddress = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    async fn find_user_by_id(&self, id: u64) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query(
            "INSERT INTO user (firstName, lastName, emailAddress, password, phoneNumber, street, city, isActive) \
             VALUES (?, ?, ?, ?, ?, ?, ?, TRUE)",
        )
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email_address)
        .bind(&new_user.password)
        .bind(&new_user.phone_number)
        .bind(&new_user.street)
        .bind(&new_user.city)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        Ok(User {
            id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email_address: new_user.email_address,
            password: new_user.password,
            phone_number: new_user.phone_number,
            street: new_user.street,
            city: new_user.city,
            is_active: true,
        })
    }

    async fn update_user(&self, id: u64, update: NewUser) -> Result<Option<User>, StoreError> {
        sqlx::query(
            "UPDATE user SET firstName = ?, lastName = ?, emailAddress = ?, password = ?, \
             phoneNumber = ?, street = ?, city = ? WHERE id = ?",
        )
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.email_address)
        .bind(&update.password)
        .bind(&update.phone_number)
        .bind(&update.street)
        .bind(&update.city)
        .bind(id)
        .execute(&self.pool)
        .await?;

        // rows_affected is 0 both for a missing row and for a no-op update,
        // so re-fetch to tell the two apart.
        self.find_user_by_id(id).await
    }

    async fn delete_user(&self, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM user WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {USER_COLUMNS} FROM user WHERE 1 = 1"
        ));
        if let Some(is_active) = filter.is_active {
            qb.push(" AND isActive = ").push_bind(is_active);
        }
        if let Some(first_name) = &filter.first_name {
            qb.push(" AND firstName = ").push_bind(first_name);
        }
        if let Some(last_name) = &filter.last_name {
            qb.push(" AND lastName = ").push_bind(last_name);
        }
        qb.push(" ORDER BY id");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter()
            .map(user_from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    async fn create_meal(&self, cook_id: u64, data: MealData) -> Result<Meal, StoreError> {
        let result = sqlx::query(
            "INSERT INTO meal (name, description, isActive, isVega, isVegan, isToTakeHome, \
             dateTime, maxAmountOfParticipants, price, imageUrl, allergenes, cookId) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.is_active)
        .bind(data.is_vega)
        .bind(data.is_vegan)
        .bind(data.is_to_take_home)
        .bind(data.date_time.naive_utc())
        .bind(data.max_amount_of_participants)
        .bind(data.price)
        .bind(&data.image_url)
        .bind(join_allergenes(&data.allergenes))
        .bind(cook_id)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        Ok(Meal {
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
        })
    }

    async fn find_meal_by_id(&self, id: u64) -> Result<Option<Meal>, StoreError> {
        let row = sqlx::query(&format!("SELECT {MEAL_COLUMNS} FROM meal WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(meal_from_row).transpose().map_err(Into::into)
    }

    async fn update_meal(&self, id: u64, data: MealData) -> Result<Option<Meal>, StoreError> {
        sqlx::query(
            "UPDATE meal SET name = ?, description = ?, isActive = ?, isVega = ?, isVegan = ?, \
             isToTakeHome = ?, dateTime = ?, maxAmountOfParticipants = ?, price = ?, \
             imageUrl = ?, allergenes = ? WHERE id = ?",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.is_active)
        .bind(data.is_vega)
        .bind(data.is_vegan)
        .bind(data.is_to_take_home)
        .bind(data.date_time.naive_utc())
        .bind(data.max_amount_of_participants)
        .bind(data.price)
        .bind(&data.image_url)
        .bind(join_allergenes(&data.allergenes))
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_meal_by_id(id).await
    }

    async fn delete_meal(&self, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM meal WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_meals(&self) -> Result<Vec<Meal>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {MEAL_COLUMNS} FROM meal ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(meal_from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }
}
