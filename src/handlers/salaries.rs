use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{DeductionFields, IncomeFields, SalaryRecordView};
use compute::aggregate::monthly::salary_record_view;
use compute::aggregate::tables::monthly_table;
use compute::money::{bounded, CheckBounds};
use compute::payroll::{deductions_of, income_of};
use compute::PayrollInput;
use model::entities::salary_record;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::schemas::{ApiResponse, AppState, ErrorResponse, StatsQuery};
use crate::store::{self, RecordFilter};

/// Request body for recording one month of pay; missing amounts are zero
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalaryRequest {
    #[validate(range(min = 1900, max = 9999))]
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: i32,
    #[serde(flatten)]
    pub income: IncomeFields,
    #[serde(flatten)]
    pub deductions: DeductionFields,
    /// Manually entered tax, ignored when `autoTax` is set
    pub tax: Option<Decimal>,
    /// Compute tax from the progressive schedule
    pub auto_tax: Option<bool>,
    pub note: Option<String>,
}

/// Request body for a partial record update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalaryRequest {
    #[validate(range(min = 1900, max = 9999))]
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 12))]
    pub month: Option<i32>,
    pub base_salary: Option<Decimal>,
    pub performance_salary: Option<Decimal>,
    pub high_temp_allowance: Option<Decimal>,
    pub low_temp_allowance: Option<Decimal>,
    pub computer_allowance: Option<Decimal>,
    pub meal_allowance: Option<Decimal>,
    pub mid_autumn_benefit: Option<Decimal>,
    pub dragon_boat_benefit: Option<Decimal>,
    pub spring_festival_benefit: Option<Decimal>,
    pub other_income: Option<Decimal>,
    pub pension_insurance: Option<Decimal>,
    pub medical_insurance: Option<Decimal>,
    pub unemployment_insurance: Option<Decimal>,
    pub critical_illness_insurance: Option<Decimal>,
    pub enterprise_annuity: Option<Decimal>,
    pub housing_fund: Option<Decimal>,
    pub other_deductions: Option<Decimal>,
    pub tax: Option<Decimal>,
    /// Recompute tax from the schedule; defaults to false
    pub auto_tax: Option<bool>,
    pub note: Option<String>,
}

impl UpdateSalaryRequest {
    fn patch_income(&self, income: &mut IncomeFields) {
        patch(&mut income.base_salary, self.base_salary);
        patch(&mut income.performance_salary, self.performance_salary);
        patch(&mut income.high_temp_allowance, self.high_temp_allowance);
        patch(&mut income.low_temp_allowance, self.low_temp_allowance);
        patch(&mut income.computer_allowance, self.computer_allowance);
        patch(&mut income.meal_allowance, self.meal_allowance);
        patch(&mut income.mid_autumn_benefit, self.mid_autumn_benefit);
        patch(&mut income.dragon_boat_benefit, self.dragon_boat_benefit);
        patch(&mut income.spring_festival_benefit, self.spring_festival_benefit);
        patch(&mut income.other_income, self.other_income);
    }

    fn patch_deductions(&self, deductions: &mut DeductionFields) {
        patch(&mut deductions.pension_insurance, self.pension_insurance);
        patch(&mut deductions.medical_insurance, self.medical_insurance);
        patch(&mut deductions.unemployment_insurance, self.unemployment_insurance);
        patch(&mut deductions.critical_illness_insurance, self.critical_illness_insurance);
        patch(&mut deductions.enterprise_annuity, self.enterprise_annuity);
        patch(&mut deductions.housing_fund, self.housing_fund);
        patch(&mut deductions.other_deductions, self.other_deductions);
    }
}

fn patch(target: &mut Decimal, value: Option<Decimal>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Writes the quantized amounts of `input` and the calculated tax.
fn store_amounts(active: &mut salary_record::ActiveModel, input: &PayrollInput, tax: Decimal) {
    let income = &input.income;
    active.base_salary = Set(income.base_salary);
    active.performance_salary = Set(income.performance_salary);
    active.high_temp_allowance = Set(income.high_temp_allowance);
    active.low_temp_allowance = Set(income.low_temp_allowance);
    active.computer_allowance = Set(income.computer_allowance);
    active.meal_allowance = Set(income.meal_allowance);
    active.mid_autumn_benefit = Set(income.mid_autumn_benefit);
    active.dragon_boat_benefit = Set(income.dragon_boat_benefit);
    active.spring_festival_benefit = Set(income.spring_festival_benefit);
    active.other_income = Set(income.other_income);

    let deductions = &input.deductions;
    active.pension_insurance = Set(deductions.pension_insurance);
    active.medical_insurance = Set(deductions.medical_insurance);
    active.unemployment_insurance = Set(deductions.unemployment_insurance);
    active.critical_illness_insurance = Set(deductions.critical_illness_insurance);
    active.enterprise_annuity = Set(deductions.enterprise_annuity);
    active.housing_fund = Set(deductions.housing_fund);
    active.other_deductions = Set(deductions.other_deductions);

    active.tax = Set(tax);
}

/// Rejects any item or tax too large for the money columns.
fn check_amounts(
    income: &IncomeFields,
    deductions: &DeductionFields,
    tax: Decimal,
) -> ApiResult<()> {
    income.check_bounds()?;
    deductions.check_bounds()?;
    bounded("tax", tax)?;
    Ok(())
}

fn duplicate_month(year: i32, month: i32) -> ApiError {
    ApiError::Conflict(format!("a salary record for {year}-{month:02} already exists"))
}

/// List the caller's salary records with derived values
#[utoipa::path(
    get,
    path = "/api/v1/salaries",
    tag = "salaries",
    params(StatsQuery),
    responses(
        (status = 200, description = "Salary records retrieved successfully", body = ApiResponse<Vec<SalaryRecordView>>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_salaries(
    user: AuthUser,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<StatsQuery>>,
) -> ApiResult<Json<ApiResponse<Vec<SalaryRecordView>>>> {
    if let Some(person_id) = query.person_id {
        store::find_owned_person(&state.db, user.id, person_id).await?;
    }

    let records = store::query_records(&state.db, user.id, &RecordFilter::from_query(&query)).await?;
    debug!("Listing {} salary records", records.len());
    Ok(Json(ApiResponse::ok(
        monthly_table(&records),
        "Salary records retrieved successfully",
    )))
}

/// Record one month of pay for a person
#[utoipa::path(
    post,
    path = "/api/v1/persons/{person_id}/salaries",
    tag = "salaries",
    params(
        ("person_id" = i32, Path, description = "Person ID"),
    ),
    request_body = CreateSalaryRequest,
    responses(
        (status = 201, description = "Salary record created successfully", body = ApiResponse<SalaryRecordView>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 409, description = "Month already recorded", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_salary(
    user: AuthUser,
    Path(person_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateSalaryRequest>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SalaryRecordView>>)> {
    let owner = store::find_owned_person(&state.db, user.id, person_id).await?;

    if store::record_exists(&state.db, owner.id, request.year, request.month, None).await? {
        warn!("Person {} already has {}-{}", owner.id, request.year, request.month);
        return Err(duplicate_month(request.year, request.month));
    }

    let tax = request.tax.unwrap_or_default();
    check_amounts(&request.income, &request.deductions, tax)?;

    let input = PayrollInput::new(request.income, request.deductions, tax)
    .with_auto_tax(request.auto_tax.unwrap_or(false));
    let summary = state.calculator.compute(&input);
    trace!(?summary, "Calculated payroll");

    let mut active = salary_record::ActiveModel {
        person_id: Set(owner.id),
        year: Set(request.year),
        month: Set(request.month),
        note: Set(request.note),
        ..Default::default()
    };
    store_amounts(&mut active, &input, summary.tax);
    let created = active.insert(&state.db).await?;

    state.cache.invalidate_all();
    info!(
        "Created salary record {} for person {} ({}-{:02})",
        created.id, owner.id, created.year, created.month
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            salary_record_view(&created),
            "Salary record created successfully",
        )),
    ))
}

/// Get one salary record with derived values
#[utoipa::path(
    get,
    path = "/api/v1/salaries/{record_id}",
    tag = "salaries",
    params(
        ("record_id" = i32, Path, description = "Salary record ID"),
    ),
    responses(
        (status = 200, description = "Salary record retrieved successfully", body = ApiResponse<SalaryRecordView>),
        (status = 404, description = "Salary record not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_salary(
    user: AuthUser,
    Path(record_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<SalaryRecordView>>> {
    let record = store::find_owned_record(&state.db, user.id, record_id).await?;
    Ok(Json(ApiResponse::ok(
        salary_record_view(&record),
        "Salary record retrieved successfully",
    )))
}

/// Partially update a salary record and recalculate its payroll
#[utoipa::path(
    put,
    path = "/api/v1/salaries/{record_id}",
    tag = "salaries",
    params(
        ("record_id" = i32, Path, description = "Salary record ID"),
    ),
    request_body = UpdateSalaryRequest,
    responses(
        (status = 200, description = "Salary record updated successfully", body = ApiResponse<SalaryRecordView>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Salary record not found", body = ErrorResponse),
        (status = 409, description = "Month already recorded", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_salary(
    user: AuthUser,
    Path(record_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateSalaryRequest>>,
) -> ApiResult<Json<ApiResponse<SalaryRecordView>>> {
    let record = store::find_owned_record(&state.db, user.id, record_id).await?;

    let year = request.year.unwrap_or(record.year);
    let month = request.month.unwrap_or(record.month);
    if (year, month) != (record.year, record.month)
        && store::record_exists(&state.db, record.person_id, year, month, Some(record.id)).await?
    {
        warn!("Moving record {} onto taken month {}-{}", record.id, year, month);
        return Err(duplicate_month(year, month));
    }

    let mut income = income_of(&record);
    request.patch_income(&mut income);
    let mut deductions = deductions_of(&record);
    request.patch_deductions(&mut deductions);

    let tax = request.tax.unwrap_or(record.tax);
    check_amounts(&income, &deductions, tax)?;

    let input = PayrollInput::new(income, deductions, tax)
        .with_auto_tax(request.auto_tax.unwrap_or(false));
    let summary = state.calculator.compute(&input);

    let mut active: salary_record::ActiveModel = record.into();
    active.year = Set(year);
    active.month = Set(month);
    if let Some(note) = request.note {
        active.note = Set(Some(note));
    }
    store_amounts(&mut active, &input, summary.tax);
    let updated = active.update(&state.db).await?;

    state.cache.invalidate_all();
    info!("Updated salary record {}", updated.id);
    Ok(Json(ApiResponse::ok(
        salary_record_view(&updated),
        "Salary record updated successfully",
    )))
}

/// Delete a salary record
#[utoipa::path(
    delete,
    path = "/api/v1/salaries/{record_id}",
    tag = "salaries",
    params(
        ("record_id" = i32, Path, description = "Salary record ID"),
    ),
    responses(
        (status = 200, description = "Salary record deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Salary record not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_salary(
    user: AuthUser,
    Path(record_id): Path<i32>,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<String>>> {
    let record = store::find_owned_record(&state.db, user.id, record_id).await?;
    record.delete(&state.db).await?;

    state.cache.invalidate_all();
    info!("Deleted salary record {}", record_id);
    Ok(Json(ApiResponse::ok(
        format!("Salary record {record_id} deleted"),
        "Salary record deleted successfully",
    )))
}
