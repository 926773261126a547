pub mod meal_service;
pub mod user_service;

pub use meal_service::MealService;
pub use user_service::UserService;
