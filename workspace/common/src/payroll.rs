use std::ops::AddAssign;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The fixed income items of one salary record.
///
/// Missing fields deserialize as zero so the struct can be flattened into
/// request bodies where every item is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeFields {
    pub base_salary: Decimal,
    pub performance_salary: Decimal,
    pub high_temp_allowance: Decimal,
    pub low_temp_allowance: Decimal,
    pub computer_allowance: Decimal,
    pub meal_allowance: Decimal,
    pub mid_autumn_benefit: Decimal,
    pub dragon_boat_benefit: Decimal,
    pub spring_festival_benefit: Decimal,
    pub other_income: Decimal,
}

impl AddAssign<&IncomeFields> for IncomeFields {
    fn add_assign(&mut self, other: &IncomeFields) {
        self.base_salary += other.base_salary;
        self.performance_salary += other.performance_salary;
        self.high_temp_allowance += other.high_temp_allowance;
        self.low_temp_allowance += other.low_temp_allowance;
        self.computer_allowance += other.computer_allowance;
        self.meal_allowance += other.meal_allowance;
        self.mid_autumn_benefit += other.mid_autumn_benefit;
        self.dragon_boat_benefit += other.dragon_boat_benefit;
        self.spring_festival_benefit += other.spring_festival_benefit;
        self.other_income += other.other_income;
    }
}

/// The fixed deduction items of one salary record (tax excluded).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DeductionFields {
    pub pension_insurance: Decimal,
    pub medical_insurance: Decimal,
    pub unemployment_insurance: Decimal,
    pub critical_illness_insurance: Decimal,
    pub enterprise_annuity: Decimal,
    pub housing_fund: Decimal,
    pub other_deductions: Decimal,
}

impl AddAssign<&DeductionFields> for DeductionFields {
    fn add_assign(&mut self, other: &DeductionFields) {
        self.pension_insurance += other.pension_insurance;
        self.medical_insurance += other.medical_insurance;
        self.unemployment_insurance += other.unemployment_insurance;
        self.critical_illness_insurance += other.critical_illness_insurance;
        self.enterprise_annuity += other.enterprise_annuity;
        self.housing_fund += other.housing_fund;
        self.other_deductions += other.other_deductions;
    }
}

/// Values derived by the payroll calculator for one record.
///
/// `grossIncome` equals `totalIncome` and is kept for API stability.
/// `actualTakeHome` is the cash-only net: it leaves out `nonCashBenefits`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSummary {
    pub total_income: Decimal,
    pub total_deductions: Decimal,
    pub gross_income: Decimal,
    pub tax: Decimal,
    pub net_income: Decimal,
    pub actual_take_home: Decimal,
    pub non_cash_benefits: Decimal,
}

impl AddAssign<&PayrollSummary> for PayrollSummary {
    fn add_assign(&mut self, other: &PayrollSummary) {
        self.total_income += other.total_income;
        self.total_deductions += other.total_deductions;
        self.gross_income += other.gross_income;
        self.tax += other.tax;
        self.net_income += other.net_income;
        self.actual_take_home += other.actual_take_home;
        self.non_cash_benefits += other.non_cash_benefits;
    }
}
