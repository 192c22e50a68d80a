use common::{
    AnnualMonthRow, AnnualTableRow, CategoryKind, CategoryStats, CategorySummary, CategoryTotals,
    ContributionPoint, DeductionFields, DeductionShare, DeductionsBreakdown, FamilySummary,
    FieldTotals, GrossVsNetPoint, IncomeComposition, IncomeFields, MonthlyDeductions, MonthlyStats,
    NetIncomePoint, PayrollSummary, PersonNetTotal, SalaryRecordView, TemplateCategoryStats,
    Waterfall, WaterfallStep, YearlyStats,
};
use compute::PayrollCalculator;
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{IntoParams, Modify, OpenApi, ToSchema};
use validator::Validate;

use crate::config::AppConfig;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for expensive operations
    pub cache: Cache<String, CachedData>,
    pub config: AppConfig,
    /// Payroll calculator used when records are created or updated
    pub calculator: PayrollCalculator,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    AnnualTable(Vec<AnnualTableRow>),
    Family(FamilySummary),
}

/// Query parameters shared by the statistics endpoints
#[derive(Debug, Default, Deserialize, Serialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Restrict to one person
    pub person_id: Option<i32>,
    /// Calendar year, e.g. 2024
    #[validate(range(min = 1900, max = 9999))]
    pub year: Option<i32>,
    /// Month (1-12)
    #[validate(range(min = 1, max = 12))]
    pub month: Option<i32>,
    /// Period range: `2024`, `2024-03` or `2024-01..2024-06`
    pub range: Option<String>,
    /// Drop all-zero months from the annual-by-month table
    pub skip_empty: Option<bool>,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::me,
        crate::handlers::persons::list_persons,
        crate::handlers::persons::create_person,
        crate::handlers::persons::get_person,
        crate::handlers::persons::update_person,
        crate::handlers::persons::delete_person,
        crate::handlers::salaries::list_salaries,
        crate::handlers::salaries::create_salary,
        crate::handlers::salaries::get_salary,
        crate::handlers::salaries::update_salary,
        crate::handlers::salaries::delete_salary,
        crate::handlers::templates::list_templates,
        crate::handlers::templates::get_default_template,
        crate::handlers::templates::get_template,
        crate::handlers::templates::create_template,
        crate::handlers::templates::update_template,
        crate::handlers::templates::delete_template,
        crate::handlers::templates::template_category_stats,
        crate::handlers::stats::monthly,
        crate::handlers::stats::yearly,
        crate::handlers::stats::family,
        crate::handlers::stats::net_income_monthly,
        crate::handlers::stats::gross_vs_net_monthly,
        crate::handlers::stats::waterfall,
        crate::handlers::stats::income_composition,
        crate::handlers::stats::deductions_breakdown,
        crate::handlers::stats::cumulative_contributions,
        crate::handlers::stats::monthly_table,
        crate::handlers::stats::annual_table,
        crate::handlers::stats::annual_monthly_table,
        crate::handlers::categories::category_stats,
        crate::handlers::categories::category_summary,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::TokenResponse,
            crate::handlers::auth::UserResponse,
            crate::handlers::persons::CreatePersonRequest,
            crate::handlers::persons::UpdatePersonRequest,
            crate::handlers::persons::PersonResponse,
            crate::handlers::salaries::CreateSalaryRequest,
            crate::handlers::salaries::UpdateSalaryRequest,
            crate::handlers::templates::CreateTemplateRequest,
            crate::handlers::templates::UpdateTemplateRequest,
            crate::handlers::templates::TemplateResponse,
            IncomeFields,
            DeductionFields,
            PayrollSummary,
            SalaryRecordView,
            MonthlyStats,
            YearlyStats,
            PersonNetTotal,
            FamilySummary,
            ContributionPoint,
            IncomeComposition,
            DeductionShare,
            MonthlyDeductions,
            DeductionsBreakdown,
            NetIncomePoint,
            GrossVsNetPoint,
            WaterfallStep,
            Waterfall,
            FieldTotals,
            AnnualTableRow,
            AnnualMonthRow,
            CategoryKind,
            CategoryStats,
            CategoryTotals,
            CategorySummary,
            TemplateCategoryStats,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and access tokens"),
        (name = "persons", description = "Household members"),
        (name = "salaries", description = "Monthly salary records"),
        (name = "templates", description = "Reusable salary templates"),
        (name = "stats", description = "Aggregated salary statistics"),
        (name = "categories", description = "Income and deduction category statistics"),
    ),
    info(
        title = "Salarium API",
        description = "Household salary tracking with payroll derivation and statistics",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
