use axum::{
    extract::{Query, State},
    response::Json,
};
use axum_valid::Valid;
use common::{CategoryStats, CategorySummary};
use compute::categories::{category_summary as summarize, fixed_category_stats};
use tracing::{debug, instrument};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::handlers::stats::scoped_records;
use crate::schemas::{ApiResponse, AppState, ErrorResponse, StatsQuery};

/// Usage statistics of every income and deduction item, largest total first
#[utoipa::path(
    get,
    path = "/api/v1/stats/categories",
    tag = "categories",
    params(StatsQuery),
    responses(
        (status = 200, description = "Category statistics", body = ApiResponse<Vec<CategoryStats>>),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn category_stats(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<Vec<CategoryStats>>>> {
    let records = scoped_records(&state, &user, &query).await?;
    let stats = fixed_category_stats(&records);
    debug!("Computed {} category rows", stats.len());
    Ok(Json(ApiResponse::ok(stats, "Category statistics computed")))
}

/// Income and deduction grand totals
#[utoipa::path(
    get,
    path = "/api/v1/stats/categories/summary",
    tag = "categories",
    params(StatsQuery),
    responses(
        (status = 200, description = "Category summary", body = ApiResponse<CategorySummary>),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn category_summary(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<CategorySummary>>> {
    let records = scoped_records(&state, &user, &query).await?;
    Ok(Json(ApiResponse::ok(summarize(&records), "Category summary computed")))
}
