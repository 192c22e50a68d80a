use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Deduction,
    Allowance,
    Bonus,
}

/// Usage statistics of one named category across a record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category_name: String,
    pub category_type: CategoryKind,
    pub total_amount: Decimal,
    pub average_amount: Decimal,
    pub usage_count: u32,
    pub usage_percentage: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    pub total: Decimal,
    pub categories_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub income: CategoryTotals,
    pub deductions: CategoryTotals,
}

/// Free-form category statistics of a user's salary templates, per section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCategoryStats {
    pub allowances: Vec<CategoryStats>,
    pub bonuses: Vec<CategoryStats>,
    pub deductions: Vec<CategoryStats>,
}
