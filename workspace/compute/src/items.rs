//! The fixed income and deduction items of a salary record, as ordered
//! (name, accessor) lists.

use common::{DeductionFields, IncomeFields};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncomeItem {
    BaseSalary,
    PerformanceSalary,
    HighTempAllowance,
    LowTempAllowance,
    ComputerAllowance,
    MealAllowance,
    MidAutumnBenefit,
    DragonBoatBenefit,
    SpringFestivalBenefit,
    OtherIncome,
}

impl IncomeItem {
    pub const ALL: [IncomeItem; 10] = [
        IncomeItem::BaseSalary,
        IncomeItem::PerformanceSalary,
        IncomeItem::HighTempAllowance,
        IncomeItem::LowTempAllowance,
        IncomeItem::ComputerAllowance,
        IncomeItem::MealAllowance,
        IncomeItem::MidAutumnBenefit,
        IncomeItem::DragonBoatBenefit,
        IncomeItem::SpringFestivalBenefit,
        IncomeItem::OtherIncome,
    ];

    /// Wire name of the field.
    pub fn key(self) -> &'static str {
        match self {
            IncomeItem::BaseSalary => "baseSalary",
            IncomeItem::PerformanceSalary => "performanceSalary",
            IncomeItem::HighTempAllowance => "highTempAllowance",
            IncomeItem::LowTempAllowance => "lowTempAllowance",
            IncomeItem::ComputerAllowance => "computerAllowance",
            IncomeItem::MealAllowance => "mealAllowance",
            IncomeItem::MidAutumnBenefit => "midAutumnBenefit",
            IncomeItem::DragonBoatBenefit => "dragonBoatBenefit",
            IncomeItem::SpringFestivalBenefit => "springFestivalBenefit",
            IncomeItem::OtherIncome => "otherIncome",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IncomeItem::BaseSalary => "Base salary",
            IncomeItem::PerformanceSalary => "Performance salary",
            IncomeItem::HighTempAllowance => "High temperature allowance",
            IncomeItem::LowTempAllowance => "Low temperature allowance",
            IncomeItem::ComputerAllowance => "Computer allowance",
            IncomeItem::MealAllowance => "Meal allowance",
            IncomeItem::MidAutumnBenefit => "Mid-autumn benefit",
            IncomeItem::DragonBoatBenefit => "Dragon boat benefit",
            IncomeItem::SpringFestivalBenefit => "Spring festival benefit",
            IncomeItem::OtherIncome => "Other income",
        }
    }

    pub fn amount(self, income: &IncomeFields) -> Decimal {
        match self {
            IncomeItem::BaseSalary => income.base_salary,
            IncomeItem::PerformanceSalary => income.performance_salary,
            IncomeItem::HighTempAllowance => income.high_temp_allowance,
            IncomeItem::LowTempAllowance => income.low_temp_allowance,
            IncomeItem::ComputerAllowance => income.computer_allowance,
            IncomeItem::MealAllowance => income.meal_allowance,
            IncomeItem::MidAutumnBenefit => income.mid_autumn_benefit,
            IncomeItem::DragonBoatBenefit => income.dragon_boat_benefit,
            IncomeItem::SpringFestivalBenefit => income.spring_festival_benefit,
            IncomeItem::OtherIncome => income.other_income,
        }
    }

    /// In-kind items: counted in total income, never in cash take-home.
    pub fn is_non_cash(self) -> bool {
        matches!(
            self,
            IncomeItem::MealAllowance
                | IncomeItem::MidAutumnBenefit
                | IncomeItem::DragonBoatBenefit
                | IncomeItem::SpringFestivalBenefit
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeductionItem {
    PensionInsurance,
    MedicalInsurance,
    UnemploymentInsurance,
    CriticalIllnessInsurance,
    EnterpriseAnnuity,
    HousingFund,
    OtherDeductions,
}

impl DeductionItem {
    pub const ALL: [DeductionItem; 7] = [
        DeductionItem::PensionInsurance,
        DeductionItem::MedicalInsurance,
        DeductionItem::UnemploymentInsurance,
        DeductionItem::CriticalIllnessInsurance,
        DeductionItem::EnterpriseAnnuity,
        DeductionItem::HousingFund,
        DeductionItem::OtherDeductions,
    ];

    /// Wire name of the field.
    pub fn key(self) -> &'static str {
        match self {
            DeductionItem::PensionInsurance => "pensionInsurance",
            DeductionItem::MedicalInsurance => "medicalInsurance",
            DeductionItem::UnemploymentInsurance => "unemploymentInsurance",
            DeductionItem::CriticalIllnessInsurance => "criticalIllnessInsurance",
            DeductionItem::EnterpriseAnnuity => "enterpriseAnnuity",
            DeductionItem::HousingFund => "housingFund",
            DeductionItem::OtherDeductions => "otherDeductions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeductionItem::PensionInsurance => "Pension insurance",
            DeductionItem::MedicalInsurance => "Medical insurance",
            DeductionItem::UnemploymentInsurance => "Unemployment insurance",
            DeductionItem::CriticalIllnessInsurance => "Critical illness insurance",
            DeductionItem::EnterpriseAnnuity => "Enterprise annuity",
            DeductionItem::HousingFund => "Housing fund",
            DeductionItem::OtherDeductions => "Other deductions",
        }
    }

    pub fn amount(self, deductions: &DeductionFields) -> Decimal {
        match self {
            DeductionItem::PensionInsurance => deductions.pension_insurance,
            DeductionItem::MedicalInsurance => deductions.medical_insurance,
            DeductionItem::UnemploymentInsurance => deductions.unemployment_insurance,
            DeductionItem::CriticalIllnessInsurance => deductions.critical_illness_insurance,
            DeductionItem::EnterpriseAnnuity => deductions.enterprise_annuity,
            DeductionItem::HousingFund => deductions.housing_fund,
            DeductionItem::OtherDeductions => deductions.other_deductions,
        }
    }

    /// Social insurance items, as opposed to annuity, housing fund and other.
    pub fn is_insurance(self) -> bool {
        matches!(
            self,
            DeductionItem::PensionInsurance
                | DeductionItem::MedicalInsurance
                | DeductionItem::UnemploymentInsurance
                | DeductionItem::CriticalIllnessInsurance
        )
    }
}
