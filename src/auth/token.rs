use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::Error, DecodingKey, EncodingKey, Header, Validation};
use model::entities::user;
use serde::{Deserialize, Serialize};

/// Access token claims: `sub` is the username, `uid` the user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: i32,
    /// Expiry as seconds since the epoch
    pub exp: usize,
}

/// Signs an HS256 access token valid for `ttl_minutes`.
pub fn issue_token(user: &user::Model, secret: &str, ttl_minutes: i64) -> Result<String, Error> {
    let exp = (Utc::now() + Duration::minutes(ttl_minutes)).timestamp().max(0) as usize;
    let claims = Claims {
        sub: user.username.clone(),
        uid: user.id,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verifies signature and expiry.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
