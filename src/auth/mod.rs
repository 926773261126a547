pub mod guard;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::ApiError;

/// Claims embedded in a bearer token. `userId` is the only identity claim
/// the rest of the system relies on.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: u64) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        Self {
            user_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
        }
    }
}

/// Sign a token for the given user id (login flow).
pub fn issue_token(user_id: u64) -> Result<String, ApiError> {
    let secret = &config::config().security.jwt_secret;
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &Claims::new(user_id), &encoding_key)
        .map_err(|e| ApiError::internal(format!("token generation failed: {e}")))
}

/// Verify signature integrity and expiry, returning the embedded claims.
/// A token is either fully valid or rejected; there is no partial outcome.
pub fn verify_token(token: &str) -> Result<Claims, ApiError> {
    let secret = &config::config().security.jwt_secret;
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| ApiError::InvalidToken)
}
