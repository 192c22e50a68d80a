use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{hash_password, issue_token, verify_password, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

const BAD_CREDENTIALS: &str = "invalid username or password";

/// Request body for creating an account
#[derive(Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Username (must be unique)
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 6))]
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Request body for exchanging credentials for a token
#[derive(Deserialize, Serialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
}

/// User response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
        }
    }
}

/// Create a user account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn register(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RegisterRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let username = request.username.trim().to_string();
    if username.is_empty() {
        return Err(ApiError::validation("username must not be blank"));
    }

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        warn!("Username '{}' is already registered", username);
        return Err(ApiError::Conflict(format!("username '{username}' already exists")));
    }

    let password_hash = hash_password(&request.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::Internal("password hashing failed".to_string())
    })?;

    let created = user::ActiveModel {
        username: Set(username),
        password_hash: Set(password_hash),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!("Registered user {} ({})", created.username, created.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UserResponse::from(created), "User registered successfully")),
    ))
}

/// Exchange username and password for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<TokenResponse>),
        (status = 400, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn login(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<LoginRequest>>,
) -> ApiResult<Json<ApiResponse<TokenResponse>>> {
    let found = user::Entity::find()
        .filter(user::Column::Username.eq(request.username.trim()))
        .one(&state.db)
        .await?;

    // Unknown users and wrong passwords answer identically
    let Some(found) = found.filter(|u| verify_password(&request.password, &u.password_hash)) else {
        warn!("Failed login for '{}'", request.username);
        return Err(ApiError::validation(BAD_CREDENTIALS));
    };

    let access_token = issue_token(&found, &state.config.jwt_secret, state.config.token_ttl_minutes)
        .map_err(|e| {
            error!("Failed to sign token: {}", e);
            ApiError::Internal("token signing failed".to_string())
        })?;

    info!("User {} logged in", found.id);
    Ok(Json(ApiResponse::ok(
        TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        },
        "Login successful",
    )))
}

/// The user owning the presented token
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument]
pub async fn me(user: AuthUser) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    debug!("Returning current user {}", user.id);
    Ok(Json(ApiResponse::ok(
        UserResponse {
            id: user.id,
            username: user.username,
        },
        "User retrieved successfully",
    )))
}
