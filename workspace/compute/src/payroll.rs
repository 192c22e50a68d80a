//! Per-record payroll derivation.
//!
//! Two gross figures exist and are kept apart on purpose:
//! [`full_gross`] counts every income item, [`chart_gross`] counts only the
//! cash items. Chart views pair the latter with [`chart_net`].

use common::{DeductionFields, IncomeFields, PayrollSummary};
use model::entities::salary_record;
use rust_decimal::Decimal;
use tracing::trace;

use crate::items::{DeductionItem, IncomeItem};
use crate::money::{quantize, sum, Quantize};

/// One row of a quick-deduction tax table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxBracket {
    /// Inclusive upper bound of taxable income; `None` for the top bracket.
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub quick_deduction: Decimal,
}

impl TaxBracket {
    pub fn new(upper_bound: Option<i64>, rate_percent: i64, quick_deduction: i64) -> Self {
        Self {
            upper_bound: upper_bound.map(Decimal::from),
            rate: Decimal::new(rate_percent, 2),
            quick_deduction: Decimal::from(quick_deduction),
        }
    }
}

/// Progressive tax schedule with a fixed monthly exemption.
///
/// The default table is illustrative, not legally exact. Callers needing an
/// authoritative schedule supply their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxSchedule {
    pub exemption: Decimal,
    /// Ordered by ascending upper bound, last one unbounded.
    pub brackets: Vec<TaxBracket>,
}

impl Default for TaxSchedule {
    fn default() -> Self {
        Self {
            exemption: Decimal::from(5000),
            brackets: vec![
                TaxBracket::new(Some(36_000), 3, 0),
                TaxBracket::new(Some(144_000), 10, 2_520),
                TaxBracket::new(Some(300_000), 20, 16_920),
                TaxBracket::new(Some(420_000), 25, 31_920),
                TaxBracket::new(Some(660_000), 30, 52_920),
                TaxBracket::new(Some(960_000), 35, 85_920),
                TaxBracket::new(None, 45, 181_920),
            ],
        }
    }
}

impl TaxSchedule {
    pub fn new(exemption: Decimal, brackets: Vec<TaxBracket>) -> Self {
        Self { exemption, brackets }
    }

    /// `max(0, gross - deductions - exemption)`
    pub fn taxable_income(&self, gross: Decimal, total_deductions: Decimal) -> Decimal {
        quantize((gross - total_deductions - self.exemption).max(Decimal::ZERO))
    }

    /// First bracket whose upper bound is at least `taxable`.
    pub fn bracket_for(&self, taxable: Decimal) -> Option<&TaxBracket> {
        self.brackets
            .iter()
            .find(|bracket| bracket.upper_bound.is_none_or(|upper| taxable <= upper))
    }

    /// `taxable * rate - quick_deduction`, never negative.
    pub fn tax_for(&self, gross: Decimal, total_deductions: Decimal) -> Decimal {
        let taxable = self.taxable_income(gross, total_deductions);
        let tax = self
            .bracket_for(taxable)
            .map(|bracket| taxable * bracket.rate - bracket.quick_deduction)
            .unwrap_or(Decimal::ZERO);
        quantize(tax.max(Decimal::ZERO))
    }
}

/// Everything the calculator needs for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayrollInput {
    pub income: IncomeFields,
    pub deductions: DeductionFields,
    /// Manually entered tax, used as-is unless `auto_tax` is set.
    pub tax: Decimal,
    pub auto_tax: bool,
}

impl PayrollInput {
    pub fn new(income: IncomeFields, deductions: DeductionFields, tax: Decimal) -> Self {
        Self {
            income: income.quantized(),
            deductions: deductions.quantized(),
            tax: quantize(tax),
            auto_tax: false,
        }
    }

    pub fn from_record(record: &salary_record::Model) -> Self {
        Self::new(income_of(record), deductions_of(record), record.tax)
    }

    pub fn with_auto_tax(mut self, auto_tax: bool) -> Self {
        self.auto_tax = auto_tax;
        self
    }
}

pub fn income_of(record: &salary_record::Model) -> IncomeFields {
    IncomeFields {
        base_salary: record.base_salary,
        performance_salary: record.performance_salary,
        high_temp_allowance: record.high_temp_allowance,
        low_temp_allowance: record.low_temp_allowance,
        computer_allowance: record.computer_allowance,
        meal_allowance: record.meal_allowance,
        mid_autumn_benefit: record.mid_autumn_benefit,
        dragon_boat_benefit: record.dragon_boat_benefit,
        spring_festival_benefit: record.spring_festival_benefit,
        other_income: record.other_income,
    }
    .quantized()
}

pub fn deductions_of(record: &salary_record::Model) -> DeductionFields {
    DeductionFields {
        pension_insurance: record.pension_insurance,
        medical_insurance: record.medical_insurance,
        unemployment_insurance: record.unemployment_insurance,
        critical_illness_insurance: record.critical_illness_insurance,
        enterprise_annuity: record.enterprise_annuity,
        housing_fund: record.housing_fund,
        other_deductions: record.other_deductions,
    }
    .quantized()
}

/// Every income item, cash and in-kind.
pub fn full_gross(income: &IncomeFields) -> Decimal {
    sum(IncomeItem::ALL.iter().map(|item| item.amount(income)))
}

/// Cash income items only: meal allowance and festival benefits excluded.
pub fn chart_gross(income: &IncomeFields) -> Decimal {
    sum(IncomeItem::ALL
        .iter()
        .filter(|item| !item.is_non_cash())
        .map(|item| item.amount(income)))
}

/// Chart gross minus deductions. Tax is not applied.
pub fn chart_net(income: &IncomeFields, deductions: &DeductionFields) -> Decimal {
    quantize(chart_gross(income) - total_deductions(deductions))
}

pub fn non_cash_benefits(income: &IncomeFields) -> Decimal {
    sum(IncomeItem::ALL
        .iter()
        .filter(|item| item.is_non_cash())
        .map(|item| item.amount(income)))
}

/// High and low temperature, computer and meal allowances.
pub fn allowances_total(income: &IncomeFields) -> Decimal {
    sum([
        income.high_temp_allowance,
        income.low_temp_allowance,
        income.computer_allowance,
        income.meal_allowance,
    ])
}

/// The three festival benefits.
pub fn benefits_total(income: &IncomeFields) -> Decimal {
    sum([
        income.mid_autumn_benefit,
        income.dragon_boat_benefit,
        income.spring_festival_benefit,
    ])
}

pub fn total_deductions(deductions: &DeductionFields) -> Decimal {
    sum(DeductionItem::ALL.iter().map(|item| item.amount(deductions)))
}

/// Pension, medical, unemployment and critical illness insurance.
pub fn insurance_total(deductions: &DeductionFields) -> Decimal {
    sum(DeductionItem::ALL
        .iter()
        .filter(|item| item.is_insurance())
        .map(|item| item.amount(deductions)))
}

/// Derives the payroll summary of a record under a tax schedule.
#[derive(Debug, Clone, Default)]
pub struct PayrollCalculator {
    schedule: TaxSchedule,
}

impl PayrollCalculator {
    pub fn new(schedule: TaxSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &TaxSchedule {
        &self.schedule
    }

    pub fn compute(&self, input: &PayrollInput) -> PayrollSummary {
        let total_income = full_gross(&input.income);
        let total_deductions = total_deductions(&input.deductions);
        let non_cash_benefits = non_cash_benefits(&input.income);

        let tax = if input.auto_tax {
            self.schedule.tax_for(total_income, total_deductions)
        } else {
            quantize(input.tax)
        };

        let net_income = quantize(total_income - total_deductions - tax);
        let actual_take_home =
            quantize(chart_gross(&input.income) - total_deductions - tax);

        trace!(
            %total_income,
            %total_deductions,
            %tax,
            %net_income,
            auto_tax = input.auto_tax,
            "Computed payroll"
        );

        PayrollSummary {
            total_income,
            total_deductions,
            gross_income: total_income,
            tax,
            net_income,
            actual_take_home,
            non_cash_benefits,
        }
    }
}

/// Computes a record's summary with the default tax schedule.
pub fn compute_payroll(input: &PayrollInput) -> PayrollSummary {
    PayrollCalculator::default().compute(input)
}
