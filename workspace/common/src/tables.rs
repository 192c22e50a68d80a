use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::payroll::{DeductionFields, IncomeFields, PayrollSummary};

/// A stored salary record together with its derived payroll values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecordView {
    pub id: i32,
    pub person_id: i32,
    pub year: i32,
    pub month: i32,
    #[serde(flatten)]
    pub income: IncomeFields,
    #[serde(flatten)]
    pub deductions: DeductionFields,
    pub note: Option<String>,
    #[serde(flatten)]
    pub summary: PayrollSummary,
}

/// Field-by-field sums over a set of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldTotals {
    #[serde(flatten)]
    pub income: IncomeFields,
    #[serde(flatten)]
    pub deductions: DeductionFields,
    #[serde(flatten)]
    pub summary: PayrollSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnualTableRow {
    pub person_id: i32,
    pub year: i32,
    pub months: u32,
    #[serde(flatten)]
    pub totals: FieldTotals,
    /// Percent change of net income against the previous year, absent when
    /// the previous year's net is not positive.
    pub yoy_growth: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnualMonthRow {
    pub month: i32,
    pub records: u32,
    #[serde(flatten)]
    pub totals: FieldTotals,
}
