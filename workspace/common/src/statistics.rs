use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::payroll::{DeductionFields, PayrollSummary};

/// One record's derived payroll values with the rolled-up item groups the
/// monthly view shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub id: i32,
    pub person_id: i32,
    pub year: i32,
    pub month: i32,
    pub base_salary: Decimal,
    pub performance: Decimal,
    pub allowances_total: Decimal,
    pub bonuses_total: Decimal,
    pub insurance_total: Decimal,
    #[serde(flatten)]
    pub summary: PayrollSummary,
}

/// Sums for one person over one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearlyStats {
    pub person_id: i32,
    pub year: i32,
    pub months: u32,
    pub total_gross: Decimal,
    pub total_net: Decimal,
    pub avg_net: Decimal,
    pub insurance_total: Decimal,
    pub tax_total: Decimal,
    pub allowances_total: Decimal,
    pub bonuses_total: Decimal,
    pub actual_take_home_total: Decimal,
    pub non_cash_benefits_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonNetTotal {
    pub person_id: i32,
    pub name: String,
    pub total_net: Decimal,
}

/// Household rollup for one year across every person of a user.
///
/// `byPerson` lists every person, including the ones without records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FamilySummary {
    pub year: i32,
    pub persons: u32,
    pub total_gross: Decimal,
    pub total_net: Decimal,
    pub insurance_total: Decimal,
    pub tax_total: Decimal,
    pub by_person: Vec<PersonNetTotal>,
}

/// Running totals of the three tracked contributions after one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContributionPoint {
    pub year: i32,
    pub month: i32,
    pub pension: Decimal,
    pub medical: Decimal,
    pub housing_fund: Decimal,
    pub pension_cumulative: Decimal,
    pub medical_cumulative: Decimal,
    pub housing_fund_cumulative: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncomeComposition {
    pub person_id: i32,
    pub year: i32,
    pub month: i32,
    pub total_income: Decimal,
    pub base_salary: Decimal,
    pub performance: Decimal,
    pub allowances: Decimal,
    pub benefits: Decimal,
    pub other: Decimal,
    pub base_salary_percent: Decimal,
    pub performance_percent: Decimal,
    pub allowances_percent: Decimal,
    pub benefits_percent: Decimal,
    pub other_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeductionShare {
    pub category: String,
    pub amount: Decimal,
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyDeductions {
    pub year: i32,
    pub month: i32,
    #[serde(flatten)]
    pub deductions: DeductionFields,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeductionsBreakdown {
    pub total: Decimal,
    pub summary: Vec<DeductionShare>,
    pub monthly: Vec<MonthlyDeductions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetIncomePoint {
    pub year: i32,
    pub month: i32,
    pub net_income: Decimal,
    pub actual_take_home: Decimal,
}

/// Chart pairing of cash gross with gross minus deductions (tax not applied).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrossVsNetPoint {
    pub year: i32,
    pub month: i32,
    pub chart_gross: Decimal,
    pub total_deductions: Decimal,
    pub chart_net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallStep {
    pub label: String,
    pub amount: Decimal,
    pub running_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Waterfall {
    pub chart_gross: Decimal,
    pub steps: Vec<WaterfallStep>,
    pub chart_net: Decimal,
}
