//! Credential handling: password hashing, access tokens and the
//! authenticated-user extractor.

mod password;
mod token;

pub use password::{hash_password, verify_password};
pub use token::{decode_token, issue_token, Claims};

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use model::entities::user;
use sea_orm::EntityTrait;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::schemas::AppState;

/// The user resolved from a bearer token.
///
/// Handlers pass `id` explicitly into every store query and engine call.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;
    let value = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("malformed authorization header".to_string()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(ApiError::Unauthorized("expected a bearer token".to_string())),
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = decode_token(token, &state.config.jwt_secret).map_err(|e| {
            warn!("Rejected access token: {}", e);
            ApiError::Unauthorized("invalid or expired token".to_string())
        })?;

        let user = user::Entity::find_by_id(claims.uid)
            .one(&state.db)
            .await?
            .filter(|user| user.username == claims.sub)
            .ok_or_else(|| {
                warn!("Token subject '{}' no longer exists", claims.sub);
                ApiError::Unauthorized("unknown user".to_string())
            })?;

        debug!("Authenticated user {} ({})", user.username, user.id);
        Ok(AuthUser {
            id: user.id,
            username: user.username,
        })
    }
}
