//! Common transport-layer types shared between the compute engine and the
//! HTTP layer. Every struct here is a wire-format response body (or a part of
//! one), so field names are camelCase and monetary values serialize as
//! fixed-point decimal strings with two fractional digits.

mod categories;
mod payroll;
mod statistics;
mod tables;

pub use categories::{CategoryKind, CategoryStats, CategorySummary, CategoryTotals, TemplateCategoryStats};
pub use payroll::{DeductionFields, IncomeFields, PayrollSummary};
pub use statistics::{
    ContributionPoint, DeductionShare, DeductionsBreakdown, FamilySummary, GrossVsNetPoint,
    IncomeComposition, MonthlyDeductions, MonthlyStats, NetIncomePoint, PersonNetTotal, Waterfall,
    WaterfallStep, YearlyStats,
};
pub use tables::{AnnualMonthRow, AnnualTableRow, FieldTotals, SalaryRecordView};
