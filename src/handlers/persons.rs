use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use compute::money::{bounded, quantize};
use model::entities::person;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::store;

/// Request body for adding a household member
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub note: Option<String>,
    /// Pension contributions made before the first tracked month
    pub pension_history: Option<Decimal>,
    pub medical_history: Option<Decimal>,
    pub housing_fund_history: Option<Decimal>,
}

/// Request body for updating a person; absent fields are left unchanged
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePersonRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub note: Option<String>,
    pub pension_history: Option<Decimal>,
    pub medical_history: Option<Decimal>,
    pub housing_fund_history: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    pub id: i32,
    pub name: String,
    pub note: Option<String>,
    pub pension_history: Decimal,
    pub medical_history: Decimal,
    pub housing_fund_history: Decimal,
}

impl From<person::Model> for PersonResponse {
    fn from(model: person::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            note: model.note,
            pension_history: model.pension_history,
            medical_history: model.medical_history,
            housing_fund_history: model.housing_fund_history,
        }
    }
}

/// Quantized history amount; negative values are rejected.
fn history_amount(field: &str, value: Decimal) -> ApiResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(ApiError::validation(format!("{field} must not be negative")));
    }
    Ok(quantize(bounded(field, value)?))
}

fn person_name(raw: &str) -> ApiResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApiError::validation("name must not be blank"));
    }
    Ok(name.to_string())
}

/// List the caller's persons
#[utoipa::path(
    get,
    path = "/api/v1/persons",
    tag = "persons",
    responses(
        (status = 200, description = "Persons retrieved successfully", body = ApiResponse<Vec<PersonResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_persons(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<PersonResponse>>>> {
    let persons = store::owned_persons(&state.db, user.id).await?;
    debug!("Retrieved {} persons for user {}", persons.len(), user.id);

    let data = persons.into_iter().map(PersonResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Persons retrieved successfully")))
}

/// Add a person to the caller's household
#[utoipa::path(
    post,
    path = "/api/v1/persons",
    tag = "persons",
    request_body = CreatePersonRequest,
    responses(
        (status = 201, description = "Person created successfully", body = ApiResponse<PersonResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_person(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreatePersonRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PersonResponse>>)> {
    trace!("Creating person for user {}", user.id);

    let created = person::ActiveModel {
        name: Set(person_name(&request.name)?),
        note: Set(request.note),
        user_id: Set(user.id),
        pension_history: Set(history_amount(
            "pensionHistory",
            request.pension_history.unwrap_or_default(),
        )?),
        medical_history: Set(history_amount(
            "medicalHistory",
            request.medical_history.unwrap_or_default(),
        )?),
        housing_fund_history: Set(history_amount(
            "housingFundHistory",
            request.housing_fund_history.unwrap_or_default(),
        )?),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    state.cache.invalidate_all();
    info!("Created person {} for user {}", created.id, user.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(PersonResponse::from(created), "Person created successfully")),
    ))
}

/// Get one of the caller's persons
#[utoipa::path(
    get,
    path = "/api/v1/persons/{person_id}",
    tag = "persons",
    params(
        ("person_id" = i32, Path, description = "Person ID"),
    ),
    responses(
        (status = 200, description = "Person retrieved successfully", body = ApiResponse<PersonResponse>),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_person(
    user: AuthUser,
    Path(person_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<PersonResponse>>> {
    let found = store::find_owned_person(&state.db, user.id, person_id).await?;
    Ok(Json(ApiResponse::ok(PersonResponse::from(found), "Person retrieved successfully")))
}

/// Update one of the caller's persons
#[utoipa::path(
    put,
    path = "/api/v1/persons/{person_id}",
    tag = "persons",
    params(
        ("person_id" = i32, Path, description = "Person ID"),
    ),
    request_body = UpdatePersonRequest,
    responses(
        (status = 200, description = "Person updated successfully", body = ApiResponse<PersonResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_person(
    user: AuthUser,
    Path(person_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdatePersonRequest>>,
) -> ApiResult<Json<ApiResponse<PersonResponse>>> {
    let found = store::find_owned_person(&state.db, user.id, person_id).await?;
    let mut active: person::ActiveModel = found.into();

    if let Some(name) = request.name.as_deref() {
        active.name = Set(person_name(name)?);
    }
    if let Some(note) = request.note {
        active.note = Set(Some(note));
    }
    if let Some(value) = request.pension_history {
        active.pension_history = Set(history_amount("pensionHistory", value)?);
    }
    if let Some(value) = request.medical_history {
        active.medical_history = Set(history_amount("medicalHistory", value)?);
    }
    if let Some(value) = request.housing_fund_history {
        active.housing_fund_history = Set(history_amount("housingFundHistory", value)?);
    }

    let updated = active.update(&state.db).await?;
    state.cache.invalidate_all();
    info!("Updated person {}", updated.id);
    Ok(Json(ApiResponse::ok(PersonResponse::from(updated), "Person updated successfully")))
}

/// Delete a person together with their salary records
#[utoipa::path(
    delete,
    path = "/api/v1/persons/{person_id}",
    tag = "persons",
    params(
        ("person_id" = i32, Path, description = "Person ID"),
    ),
    responses(
        (status = 200, description = "Person deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_person(
    user: AuthUser,
    Path(person_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<String>>> {
    let found = store::find_owned_person(&state.db, user.id, person_id).await?;
    let result = found.delete(&state.db).await?;
    if result.rows_affected == 0 {
        warn!("Person {} vanished before delete", person_id);
        return Err(ApiError::not_found(format!("Person {person_id}")));
    }

    state.cache.invalidate_all();
    info!("Deleted person {}", person_id);
    Ok(Json(ApiResponse::ok(
        format!("Person {person_id} deleted"),
        "Person deleted successfully",
    )))
}
