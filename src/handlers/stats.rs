use axum::{
    extract::{Query, State},
    response::Json,
};
use axum_valid::Valid;
use common::{
    AnnualMonthRow, AnnualTableRow, ContributionPoint, DeductionsBreakdown, FamilySummary,
    GrossVsNetPoint, IncomeComposition, MonthlyStats, NetIncomePoint, SalaryRecordView, Waterfall,
    YearlyStats,
};
use compute::aggregate::{charts, composition, contributions, deductions, monthly, tables, yearly};
use compute::period::month_key;
use compute::{parse_range, PeriodRange};
use model::entities::salary_record;
use tracing::{debug, instrument};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse, StatsQuery};
use crate::store::{self, RecordFilter};

/// Records matching every filter of `query`, after checking that a
/// requested person belongs to the caller.
pub(crate) async fn scoped_records(
    state: &AppState,
    user: &AuthUser,
    query: &StatsQuery,
) -> ApiResult<Vec<salary_record::Model>> {
    if let Some(person_id) = query.person_id {
        store::find_owned_person(&state.db, user.id, person_id).await?;
    }
    Ok(store::query_records(&state.db, user.id, &RecordFilter::from_query(query)).await?)
}

fn required_year(query: &StatsQuery) -> ApiResult<i32> {
    query
        .year
        .ok_or_else(|| ApiError::validation("query parameter 'year' is required"))
}

/// Per-record stats with allowance, bonus and insurance rollups
#[utoipa::path(
    get,
    path = "/api/v1/stats/monthly",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Monthly statistics", body = ApiResponse<Vec<MonthlyStats>>),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn monthly(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<Vec<MonthlyStats>>>> {
    let records = scoped_records(&state, &user, &query).await?;
    Ok(Json(ApiResponse::ok(
        monthly::monthly_stats(&records),
        "Monthly statistics computed",
    )))
}

/// Per-person totals for one year
#[utoipa::path(
    get,
    path = "/api/v1/stats/yearly",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Yearly statistics", body = ApiResponse<Vec<YearlyStats>>),
        (status = 400, description = "Missing year", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn yearly(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<Vec<YearlyStats>>>> {
    let year = required_year(&query)?;
    let records = scoped_records(&state, &user, &query).await?;
    Ok(Json(ApiResponse::ok(
        yearly::yearly_stats(&records, year),
        "Yearly statistics computed",
    )))
}

/// Household rollup for one year across all persons
#[utoipa::path(
    get,
    path = "/api/v1/stats/family",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Family summary", body = ApiResponse<FamilySummary>),
        (status = 400, description = "Missing year", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn family(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<FamilySummary>>> {
    let year = required_year(&query)?;

    let cache_key = format!("family:{}:{}", user.id, year);
    if let Some(CachedData::Family(summary)) = state.cache.get(&cache_key).await {
        debug!("Family summary served from cache");
        return Ok(Json(ApiResponse::ok(summary, "Family summary retrieved from cache")));
    }

    let persons = store::owned_persons(&state.db, user.id).await?;
    let filter = RecordFilter {
        year: Some(year),
        ..Default::default()
    };
    let records = store::query_records(&state.db, user.id, &filter).await?;
    let summary = yearly::family_summary(year, &persons, &records);

    state.cache.insert(cache_key, CachedData::Family(summary.clone())).await;
    Ok(Json(ApiResponse::ok(summary, "Family summary computed")))
}

/// Net income and cash take-home per month
#[utoipa::path(
    get,
    path = "/api/v1/stats/net-income/monthly",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Net income series", body = ApiResponse<Vec<NetIncomePoint>>),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn net_income_monthly(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<Vec<NetIncomePoint>>>> {
    let records = scoped_records(&state, &user, &query).await?;
    Ok(Json(ApiResponse::ok(
        charts::net_income_monthly(&records),
        "Net income series computed",
    )))
}

/// Cash gross against gross minus deductions per month
#[utoipa::path(
    get,
    path = "/api/v1/stats/gross-vs-net/monthly",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Gross versus net series", body = ApiResponse<Vec<GrossVsNetPoint>>),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn gross_vs_net_monthly(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<Vec<GrossVsNetPoint>>>> {
    let records = scoped_records(&state, &user, &query).await?;
    Ok(Json(ApiResponse::ok(
        charts::gross_vs_net_monthly(&records),
        "Gross versus net series computed",
    )))
}

/// Cash gross broken down by deduction category down to net
#[utoipa::path(
    get,
    path = "/api/v1/stats/waterfall",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Waterfall chart", body = ApiResponse<Waterfall>),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn waterfall(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<Waterfall>>> {
    let records = scoped_records(&state, &user, &query).await?;
    Ok(Json(ApiResponse::ok(charts::waterfall(&records), "Waterfall computed")))
}

/// Income shares of base, performance, allowances, benefits and other per record
#[utoipa::path(
    get,
    path = "/api/v1/stats/income-composition",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Income composition", body = ApiResponse<Vec<IncomeComposition>>),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn income_composition(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<Vec<IncomeComposition>>>> {
    let records = scoped_records(&state, &user, &query).await?;
    Ok(Json(ApiResponse::ok(
        composition::income_composition(&records),
        "Income composition computed",
    )))
}

/// Deduction totals per category and per month
#[utoipa::path(
    get,
    path = "/api/v1/stats/deductions/breakdown",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Deductions breakdown", body = ApiResponse<DeductionsBreakdown>),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn deductions_breakdown(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<DeductionsBreakdown>>> {
    let records = scoped_records(&state, &user, &query).await?;
    Ok(Json(ApiResponse::ok(
        deductions::deductions_breakdown(&records),
        "Deductions breakdown computed",
    )))
}

/// Running pension, medical and housing fund totals for one person
///
/// Records before the requested period still count toward the totals.
/// The period comes from `range`, else `year` with an optional `month`.
#[utoipa::path(
    get,
    path = "/api/v1/stats/contributions/cumulative",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Cumulative contributions", body = ApiResponse<Vec<ContributionPoint>>),
        (status = 400, description = "Missing personId, or month without year", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn cumulative_contributions(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<Vec<ContributionPoint>>>> {
    let person_id = query
        .person_id
        .ok_or_else(|| ApiError::validation("query parameter 'personId' is required"))?;
    let person = store::find_owned_person(&state.db, user.id, person_id).await?;

    let range = match (query.range.as_deref(), query.year, query.month) {
        (Some(raw), _, _) => parse_range(raw),
        (None, Some(year), Some(month)) => PeriodRange::month(year, month),
        (None, Some(year), None) => PeriodRange::year(year),
        (None, None, Some(_)) => {
            return Err(ApiError::validation(
                "query parameter 'month' requires 'year'",
            ))
        }
        (None, None, None) => PeriodRange::all(),
    };

    // Every record of the person, earlier months seed the running totals
    let filter = RecordFilter {
        person_id: Some(person.id),
        ..Default::default()
    };
    let records = store::query_records(&state.db, user.id, &filter).await?;

    Ok(Json(ApiResponse::ok(
        contributions::cumulative_contributions(&person, &records, &range),
        "Cumulative contributions computed",
    )))
}

/// One row per record with every stored and derived field
#[utoipa::path(
    get,
    path = "/api/v1/stats/tables/monthly",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Monthly table", body = ApiResponse<Vec<SalaryRecordView>>),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn monthly_table(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<Vec<SalaryRecordView>>>> {
    let records = scoped_records(&state, &user, &query).await?;
    Ok(Json(ApiResponse::ok(tables::monthly_table(&records), "Monthly table computed")))
}

/// Per-person field totals for one year with growth against the previous year
#[utoipa::path(
    get,
    path = "/api/v1/stats/tables/annual",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Annual table", body = ApiResponse<Vec<AnnualTableRow>>),
        (status = 400, description = "Missing year", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn annual_table(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<Vec<AnnualTableRow>>>> {
    let year = required_year(&query)?;
    if let Some(person_id) = query.person_id {
        store::find_owned_person(&state.db, user.id, person_id).await?;
    }

    let cache_key = format!("annual:{}:{}:{:?}", user.id, year, query.person_id);
    if let Some(CachedData::AnnualTable(rows)) = state.cache.get(&cache_key).await {
        debug!("Annual table served from cache");
        return Ok(Json(ApiResponse::ok(rows, "Annual table retrieved from cache")));
    }

    let filter = RecordFilter {
        person_id: query.person_id,
        range: Some(PeriodRange {
            start: month_key(year - 1, 1),
            end: month_key(year, 12),
        }),
        ..Default::default()
    };
    let records = store::query_records(&state.db, user.id, &filter).await?;
    let rows = tables::annual_table(&records, year);

    state.cache.insert(cache_key, CachedData::AnnualTable(rows.clone())).await;
    Ok(Json(ApiResponse::ok(rows, "Annual table computed")))
}

/// Twelve month buckets of one year summed across the selected records
#[utoipa::path(
    get,
    path = "/api/v1/stats/tables/annual-monthly",
    tag = "stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Annual table by month", body = ApiResponse<Vec<AnnualMonthRow>>),
        (status = 400, description = "Missing year", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn annual_monthly_table(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<Vec<AnnualMonthRow>>>> {
    let year = required_year(&query)?;
    let records = scoped_records(&state, &user, &query).await?;
    Ok(Json(ApiResponse::ok(
        tables::annual_monthly_table(&records, year, query.skip_empty.unwrap_or(false)),
        "Annual table by month computed",
    )))
}
