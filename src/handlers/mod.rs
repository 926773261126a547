pub mod auth;
pub mod info;
pub mod meal;
pub mod user;
