// Request payload validation. One schema per route, evaluated in a fixed
// order: presence of every field first, then types, then formats. Validation
// stops at the first violation so exactly one message is surfaced, and it
// never mutates the payload.
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::ApiError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").unwrap());

/// Registration payload, also used for user updates.
pub fn register(body: &Value) -> Result<(), ApiError> {
    present(body, "emailAddress", "Missing email")?;
    present(body, "firstName", "Missing first name")?;
    present(body, "lastName", "Missing last name")?;
    present(body, "password", "Missing password")?;

    let email = string(body, "emailAddress", "Email must be a string")?;
    string(body, "firstName", "First name must be a string")?;
    string(body, "lastName", "Last name must be a string")?;
    let password = string(body, "password", "Password must be a string")?;
    let phone = optional_string(body, "phoneNumber", "Phone number must be a string")?;

    if !EMAIL_RE.is_match(email) {
        return Err(fail("Invalid email address"));
    }
    if password.chars().count() < 6 {
        return Err(fail("Password must be at least 6 characters long"));
    }
    if let Some(phone) = phone {
        if phone.chars().count() != 10 {
            return Err(fail("Phone number must be 10 characters long"));
        }
    }
    Ok(())
}

/// Login payload.
pub fn login(body: &Value) -> Result<(), ApiError> {
    present(body, "emailAddress", "Email address is required")?;
    present(body, "password", "Password is required")?;

    string(body, "emailAddress", "Email must be a string")?;
    string(body, "password", "Password must be a string")?;
    Ok(())
}

/// Meal create/update payload.
pub fn meal(body: &Value) -> Result<(), ApiError> {
    const FIELDS: [&str; 11] = [
        "name",
        "description",
        "isActive",
        "isVega",
        "isVegan",
        "isToTakeHome",
        "dateTime",
        "maxAmountOfParticipants",
        "price",
        "imageUrl",
        "allergenes",
    ];
    for field in FIELDS {
        present(body, field, &format!("Missing {field}"))?;
    }

    string(body, "name", "name must be a string")?;
    string(body, "description", "description must be a string")?;
    boolean(body, "isActive", "isActive must be a boolean")?;
    boolean(body, "isVega", "isVega must be a boolean")?;
    boolean(body, "isVegan", "isVegan must be a boolean")?;
    boolean(body, "isToTakeHome", "isToTakeHome must be a boolean")?;
    let date = string(body, "dateTime", "dateTime must be a string")?;
    number(body, "maxAmountOfParticipants", "maxAmountOfParticipants must be a number")?;
    number(body, "price", "price must be a number")?;
    string(body, "imageUrl", "imageUrl must be a string")?;
    string_list(body, "allergenes", "allergenes must be a list of strings")?;

    if parse_date_time(date).is_none() {
        return Err(fail("Invalid dateTime"));
    }
    Ok(())
}

/// Accepts RFC 3339 as well as the bare `YYYY-MM-DD HH:MM:SS` forms clients
/// commonly send; bare timestamps are taken as UTC.
pub fn parse_date_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

fn fail(message: impl Into<String>) -> ApiError {
    ApiError::validation(message)
}

// A field is present when it exists, is not null, and is not an empty
// string. Type mismatches are deliberately not caught here; they surface in
// the type pass with their own message.
fn present(body: &Value, field: &str, message: &str) -> Result<(), ApiError> {
    match body.get(field) {
        None | Some(Value::Null) => Err(fail(message)),
        Some(Value::String(s)) if s.is_empty() => Err(fail(message)),
        Some(_) => Ok(()),
    }
}

fn string<'a>(body: &'a Value, field: &str, message: &str) -> Result<&'a str, ApiError> {
    body.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| fail(message))
}

fn optional_string<'a>(
    body: &'a Value,
    field: &str,
    message: &str,
) -> Result<Option<&'a str>, ApiError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(fail(message)),
    }
}

fn boolean(body: &Value, field: &str, message: &str) -> Result<bool, ApiError> {
    body.get(field)
        .and_then(Value::as_bool)
        .ok_or_else(|| fail(message))
}

fn number(body: &Value, field: &str, message: &str) -> Result<f64, ApiError> {
    body.get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| fail(message))
}

fn string_list(body: &Value, field: &str, message: &str) -> Result<(), ApiError> {
    match body.get(field) {
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => Ok(()),
        _ => Err(fail(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_registration() -> Value {
        json!({
            "emailAddress": "j.doe@server.com",
            "firstName": "John",
            "lastName": "Doe",
            "password": "secret123",
        })
    }

    #[test]
    fn valid_registration_is_accepted() {
        assert!(register(&valid_registration()).is_ok());
    }

    #[test]
    fn missing_last_name() {
        let mut body = valid_registration();
        body.as_object_mut().unwrap().remove("lastName");
        let err = register(&body).unwrap_err();
        assert_eq!(err.to_string(), "Missing last name");
    }

    #[test]
    fn email_without_domain_is_rejected() {
        let mut body = valid_registration();
        body["emailAddress"] = json!("johndoe");
        let err = register(&body).unwrap_err();
        assert_eq!(err.to_string(), "Invalid email address");
    }

    #[test]
    fn email_with_one_letter_tld_is_rejected() {
        let mut body = valid_registration();
        body["emailAddress"] = json!("j.doe@server.c");
        let err = register(&body).unwrap_err();
        assert_eq!(err.to_string(), "Invalid email address");
    }

    #[test]
    fn short_password_is_rejected() {
        let mut body = valid_registration();
        body["password"] = json!("12345");
        let err = register(&body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Password must be at least 6 characters long"
        );
    }

    #[test]
    fn phone_number_length_is_checked_when_present() {
        let mut body = valid_registration();
        body["phoneNumber"] = json!("06123456");
        let err = register(&body).unwrap_err();
        assert_eq!(err.to_string(), "Phone number must be 10 characters long");

        body["phoneNumber"] = json!("0612345678");
        assert!(register(&body).is_ok());
    }

    #[test]
    fn presence_is_checked_before_format() {
        // lastName missing and email invalid: the presence violation wins
        // because all presence checks run before any format check.
        let body = json!({
            "emailAddress": "johndoe",
            "firstName": "John",
            "password": "secret123",
        });
        let err = register(&body).unwrap_err();
        assert_eq!(err.to_string(), "Missing last name");
    }

    #[test]
    fn type_errors_have_their_own_message() {
        let mut body = valid_registration();
        body["firstName"] = json!(42);
        let err = register(&body).unwrap_err();
        assert_eq!(err.to_string(), "First name must be a string");
    }

    #[test]
    fn validation_is_idempotent() {
        let mut body = valid_registration();
        body["emailAddress"] = json!("johndoe");
        let first = register(&body).unwrap_err().to_string();
        let second = register(&body).unwrap_err().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn login_requires_both_fields() {
        let err = login(&json!({"password": "secret"})).unwrap_err();
        assert_eq!(err.to_string(), "Email address is required");

        let err = login(&json!({"emailAddress": "j.doe@server.com"})).unwrap_err();
        assert_eq!(err.to_string(), "Password is required");

        let err = login(&json!({"emailAddress": 1, "password": "x"})).unwrap_err();
        assert_eq!(err.to_string(), "Email must be a string");
    }

    fn valid_meal() -> Value {
        json!({
            "name": "Spaghetti",
            "description": "Classic spaghetti bolognese",
            "isActive": true,
            "isVega": false,
            "isVegan": false,
            "isToTakeHome": true,
            "dateTime": "2026-09-01T17:30:00",
            "maxAmountOfParticipants": 6,
            "price": 6.75,
            "imageUrl": "https://example.com/spaghetti.jpg",
            "allergenes": ["gluten", "lactose"],
        })
    }

    #[test]
    fn valid_meal_is_accepted() {
        assert!(meal(&valid_meal()).is_ok());
    }

    #[test]
    fn meal_field_checks_run_in_schema_order() {
        let mut body = valid_meal();
        body.as_object_mut().unwrap().remove("name");
        body.as_object_mut().unwrap().remove("price");
        let err = meal(&body).unwrap_err();
        assert_eq!(err.to_string(), "Missing name");
    }

    #[test]
    fn meal_boolean_type_is_enforced() {
        let mut body = valid_meal();
        body["isVegan"] = json!("yes");
        let err = meal(&body).unwrap_err();
        assert_eq!(err.to_string(), "isVegan must be a boolean");
    }

    #[test]
    fn unparseable_date_time_is_rejected() {
        let mut body = valid_meal();
        body["dateTime"] = json!("tomorrow-ish");
        let err = meal(&body).unwrap_err();
        assert_eq!(err.to_string(), "Invalid dateTime");
    }

    #[test]
    fn allergenes_must_all_be_strings() {
        let mut body = valid_meal();
        body["allergenes"] = json!(["gluten", 3]);
        let err = meal(&body).unwrap_err();
        assert_eq!(err.to_string(), "allergenes must be a list of strings");
    }

    #[test]
    fn date_time_accepts_common_forms() {
        assert!(parse_date_time("2026-09-01T17:30:00Z").is_some());
        assert!(parse_date_time("2026-09-01T17:30:00").is_some());
        assert!(parse_date_time("2026-09-01 17:30:00").is_some());
        assert!(parse_date_time("01/09/2026").is_none());
    }
}
