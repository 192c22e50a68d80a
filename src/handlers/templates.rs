use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use common::{CategoryKind, TemplateCategoryStats};
use compute::categories::{map_category_stats, CategoryMap, CategoryOrder};
use compute::money::ToMoney;
use model::entities::salary_template;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Raw category map as sent by clients: amounts may be numbers or strings
pub type RawCategoryMap = BTreeMap<String, Value>;

/// Request body for creating a salary template
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    /// Category name to amount
    #[schema(value_type = Option<Object>)]
    pub allowances_template: Option<RawCategoryMap>,
    #[schema(value_type = Option<Object>)]
    pub bonuses_template: Option<RawCategoryMap>,
    #[schema(value_type = Option<Object>)]
    pub deductions_template: Option<RawCategoryMap>,
    #[serde(default)]
    pub is_default: bool,
}

/// Request body for a partial template update
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub allowances_template: Option<RawCategoryMap>,
    #[schema(value_type = Option<Object>)]
    pub bonuses_template: Option<RawCategoryMap>,
    #[schema(value_type = Option<Object>)]
    pub deductions_template: Option<RawCategoryMap>,
    pub is_default: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub allowances_template: Option<CategoryMap>,
    #[schema(value_type = Option<Object>)]
    pub bonuses_template: Option<CategoryMap>,
    #[schema(value_type = Option<Object>)]
    pub deductions_template: Option<CategoryMap>,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<salary_template::Model> for TemplateResponse {
    type Error = ApiError;

    fn try_from(model: salary_template::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            allowances_template: stored_map(model.allowances_template.as_ref())?,
            bonuses_template: stored_map(model.bonuses_template.as_ref())?,
            deductions_template: stored_map(model.deductions_template.as_ref())?,
            name: model.name,
            description: model.description,
            is_default: model.is_default,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Canonicalizes a client map: every amount goes through [`ToMoney`].
fn canonical_map(section: &str, raw: &RawCategoryMap) -> ApiResult<CategoryMap> {
    raw.iter()
        .map(|(name, value)| -> ApiResult<(String, Decimal)> {
            let amount = match value {
                Value::Number(number) => number.to_string().to_money()?,
                Value::String(text) => text.to_money()?,
                Value::Null => Decimal::ZERO,
                other => {
                    return Err(ApiError::validation(format!(
                        "{section}.{name}: expected a number, got {other}"
                    )))
                }
            };
            Ok((name.clone(), amount))
        })
        .collect()
}

fn to_json(section: &str, raw: Option<&RawCategoryMap>) -> ApiResult<Option<Value>> {
    raw.map(|raw| {
        let map = canonical_map(section, raw)?;
        serde_json::to_value(map).map_err(|e| ApiError::Internal(e.to_string()))
    })
    .transpose()
}

fn stored_map(json: Option<&Value>) -> ApiResult<Option<CategoryMap>> {
    json.map(|value| {
        serde_json::from_value::<CategoryMap>(value.clone()).map_err(|e| {
            error!("Stored template map is unreadable: {}", e);
            ApiError::Internal(format!("corrupt template map: {e}"))
        })
    })
    .transpose()
}

fn template_name(raw: &str) -> ApiResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApiError::validation("name must not be blank"));
    }
    Ok(name.to_string())
}

/// Clears the default flag on the user's templates other than `keep`.
async fn clear_defaults<C: ConnectionTrait>(db: &C, user_id: i32, keep: Option<i32>) -> ApiResult<()> {
    let mut update = salary_template::Entity::update_many()
        .col_expr(salary_template::Column::IsDefault, Expr::value(false))
        .filter(salary_template::Column::UserId.eq(user_id))
        .filter(salary_template::Column::IsDefault.eq(true));
    if let Some(id) = keep {
        update = update.filter(salary_template::Column::Id.ne(id));
    }
    let result = update.exec(db).await?;
    debug!("Cleared default flag on {} templates", result.rows_affected);
    Ok(())
}

async fn find_active_template<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    template_id: i32,
) -> ApiResult<salary_template::Model> {
    salary_template::Entity::find_by_id(template_id)
        .filter(salary_template::Column::UserId.eq(user_id))
        .filter(salary_template::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Template {template_id}")))
}

async fn active_templates(state: &AppState, user_id: i32) -> ApiResult<Vec<salary_template::Model>> {
    Ok(salary_template::Entity::find()
        .filter(salary_template::Column::UserId.eq(user_id))
        .filter(salary_template::Column::IsActive.eq(true))
        .order_by_desc(salary_template::Column::CreatedAt)
        .order_by_desc(salary_template::Column::Id)
        .all(&state.db)
        .await?)
}

/// List the caller's active templates, newest first
#[utoipa::path(
    get,
    path = "/api/v1/salary-templates",
    tag = "templates",
    responses(
        (status = 200, description = "Templates retrieved successfully", body = ApiResponse<Vec<TemplateResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_templates(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<TemplateResponse>>>> {
    let templates = active_templates(&state, user.id).await?;
    debug!("Retrieved {} templates", templates.len());

    let data = templates
        .into_iter()
        .map(TemplateResponse::try_from)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(ApiResponse::ok(data, "Templates retrieved successfully")))
}

/// Get the caller's default template
#[utoipa::path(
    get,
    path = "/api/v1/salary-templates/default",
    tag = "templates",
    responses(
        (status = 200, description = "Default template retrieved successfully", body = ApiResponse<TemplateResponse>),
        (status = 404, description = "No default template", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_default_template(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<TemplateResponse>>> {
    let template = salary_template::Entity::find()
        .filter(salary_template::Column::UserId.eq(user.id))
        .filter(salary_template::Column::IsActive.eq(true))
        .filter(salary_template::Column::IsDefault.eq(true))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Default template"))?;

    Ok(Json(ApiResponse::ok(
        TemplateResponse::try_from(template)?,
        "Default template retrieved successfully",
    )))
}

/// Get one active template
#[utoipa::path(
    get,
    path = "/api/v1/salary-templates/{template_id}",
    tag = "templates",
    params(
        ("template_id" = i32, Path, description = "Template ID"),
    ),
    responses(
        (status = 200, description = "Template retrieved successfully", body = ApiResponse<TemplateResponse>),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_template(
    user: AuthUser,
    Path(template_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<TemplateResponse>>> {
    let template = find_active_template(&state.db, user.id, template_id).await?;
    Ok(Json(ApiResponse::ok(
        TemplateResponse::try_from(template)?,
        "Template retrieved successfully",
    )))
}

/// Create a template; a new default replaces the previous one
#[utoipa::path(
    post,
    path = "/api/v1/salary-templates",
    tag = "templates",
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template created successfully", body = ApiResponse<TemplateResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_template(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateTemplateRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TemplateResponse>>)> {
    let now = Utc::now();
    let active = salary_template::ActiveModel {
        user_id: Set(user.id),
        name: Set(template_name(&request.name)?),
        description: Set(request.description),
        allowances_template: Set(to_json("allowancesTemplate", request.allowances_template.as_ref())?),
        bonuses_template: Set(to_json("bonusesTemplate", request.bonuses_template.as_ref())?),
        deductions_template: Set(to_json("deductionsTemplate", request.deductions_template.as_ref())?),
        is_default: Set(request.is_default),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let txn = state.db.begin().await?;
    if request.is_default {
        clear_defaults(&txn, user.id, None).await?;
    }
    let created = active.insert(&txn).await?;
    txn.commit().await?;

    info!("Created template {} for user {}", created.id, user.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            TemplateResponse::try_from(created)?,
            "Template created successfully",
        )),
    ))
}

/// Partially update a template
#[utoipa::path(
    put,
    path = "/api/v1/salary-templates/{template_id}",
    tag = "templates",
    params(
        ("template_id" = i32, Path, description = "Template ID"),
    ),
    request_body = UpdateTemplateRequest,
    responses(
        (status = 200, description = "Template updated successfully", body = ApiResponse<TemplateResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_template(
    user: AuthUser,
    Path(template_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateTemplateRequest>>,
) -> ApiResult<Json<ApiResponse<TemplateResponse>>> {
    let txn = state.db.begin().await?;
    let template = find_active_template(&txn, user.id, template_id).await?;
    let mut active: salary_template::ActiveModel = template.into();

    if let Some(name) = request.name.as_deref() {
        active.name = Set(template_name(name)?);
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }
    if let Some(raw) = request.allowances_template.as_ref() {
        active.allowances_template = Set(to_json("allowancesTemplate", Some(raw))?);
    }
    if let Some(raw) = request.bonuses_template.as_ref() {
        active.bonuses_template = Set(to_json("bonusesTemplate", Some(raw))?);
    }
    if let Some(raw) = request.deductions_template.as_ref() {
        active.deductions_template = Set(to_json("deductionsTemplate", Some(raw))?);
    }
    if let Some(is_default) = request.is_default {
        if is_default {
            clear_defaults(&txn, user.id, Some(template_id)).await?;
        }
        active.is_default = Set(is_default);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!("Updated template {}", updated.id);
    Ok(Json(ApiResponse::ok(
        TemplateResponse::try_from(updated)?,
        "Template updated successfully",
    )))
}

/// Deactivate a template; the default template cannot be deleted
#[utoipa::path(
    delete,
    path = "/api/v1/salary-templates/{template_id}",
    tag = "templates",
    params(
        ("template_id" = i32, Path, description = "Template ID"),
    ),
    responses(
        (status = 200, description = "Template deleted successfully", body = ApiResponse<String>),
        (status = 400, description = "Template is the default", body = ErrorResponse),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_template(
    user: AuthUser,
    Path(template_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<String>>> {
    let template = find_active_template(&state.db, user.id, template_id).await?;
    if template.is_default {
        warn!("Refusing to delete default template {}", template_id);
        return Err(ApiError::validation("cannot delete the default template"));
    }

    let mut active: salary_template::ActiveModel = template.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now());
    active.update(&state.db).await?;

    info!("Deactivated template {}", template_id);
    Ok(Json(ApiResponse::ok(
        format!("Template {template_id} deleted"),
        "Template deleted successfully",
    )))
}

/// Category usage across the caller's active templates
#[utoipa::path(
    get,
    path = "/api/v1/salary-templates/category-stats",
    tag = "templates",
    responses(
        (status = 200, description = "Template category statistics", body = ApiResponse<TemplateCategoryStats>)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn template_category_stats(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<TemplateCategoryStats>>> {
    let templates = active_templates(&state, user.id).await?;

    let mut allowances = Vec::with_capacity(templates.len());
    let mut bonuses = Vec::with_capacity(templates.len());
    let mut deductions = Vec::with_capacity(templates.len());
    for template in &templates {
        allowances.push(stored_map(template.allowances_template.as_ref())?.unwrap_or_default());
        bonuses.push(stored_map(template.bonuses_template.as_ref())?.unwrap_or_default());
        deductions.push(stored_map(template.deductions_template.as_ref())?.unwrap_or_default());
    }

    let stats = TemplateCategoryStats {
        allowances: map_category_stats(&allowances, CategoryKind::Allowance, CategoryOrder::UsageCount),
        bonuses: map_category_stats(&bonuses, CategoryKind::Bonus, CategoryOrder::UsageCount),
        deductions: map_category_stats(&deductions, CategoryKind::Deduction, CategoryOrder::UsageCount),
    };
    debug!("Computed template category stats over {} templates", templates.len());
    Ok(Json(ApiResponse::ok(stats, "Template category statistics computed")))
}
