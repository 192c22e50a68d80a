//! Stateless folds of salary records into the statistics views.
//!
//! Every function takes the already-filtered record set (and, where needed,
//! the persons owning it). Records are recomputed with their stored tax, so
//! views never depend on how the tax was originally produced.

pub mod charts;
pub mod composition;
pub mod contributions;
pub mod deductions;
pub mod monthly;
pub mod tables;
pub mod yearly;

use common::{FieldTotals, PayrollSummary};
use model::entities::salary_record;

use crate::money::Quantize;
use crate::payroll::{compute_payroll, PayrollInput};
use crate::period::month_key;

/// A record paired with its quantized inputs and derived summary.
pub(crate) struct Derived<'a> {
    pub record: &'a salary_record::Model,
    pub input: PayrollInput,
    pub summary: PayrollSummary,
}

impl<'a> Derived<'a> {
    pub fn new(record: &'a salary_record::Model) -> Self {
        let input = PayrollInput::from_record(record);
        let summary = compute_payroll(&input);
        Self {
            record,
            input,
            summary,
        }
    }
}

/// Derives every record, ordered by period key, then person, then id.
pub(crate) fn chronological(records: &[salary_record::Model]) -> Vec<Derived<'_>> {
    let mut sorted: Vec<&salary_record::Model> = records.iter().collect();
    sorted.sort_by_key(|record| (month_key(record.year, record.month), record.person_id, record.id));
    sorted.into_iter().map(Derived::new).collect()
}

/// Field-by-field accumulator.
#[derive(Debug, Default)]
pub(crate) struct Totals {
    pub records: u32,
    pub fields: FieldTotals,
}

impl Totals {
    pub fn add(&mut self, derived: &Derived<'_>) {
        self.records += 1;
        self.fields.income += &derived.input.income;
        self.fields.deductions += &derived.input.deductions;
        self.fields.summary += &derived.summary;
    }

    pub fn finish(self) -> (u32, FieldTotals) {
        (self.records, self.fields.quantized())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Record builders shared by the aggregation tests.

    use std::str::FromStr;

    use model::entities::{person, salary_record};
    use rust_decimal::Decimal;

    pub fn d(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    pub fn person(id: i32, name: &str) -> person::Model {
        person::Model {
            id,
            name: name.to_string(),
            note: None,
            user_id: 1,
            pension_history: Decimal::ZERO,
            medical_history: Decimal::ZERO,
            housing_fund_history: Decimal::ZERO,
        }
    }

    /// A record with the given base salary, 300 meal allowance, 800 pension
    /// and 200 medical insurance, 600 housing fund and the given tax.
    pub fn record(id: i32, person_id: i32, year: i32, month: i32, base: &str, tax: &str) -> salary_record::Model {
        salary_record::Model {
            id,
            person_id,
            year,
            month,
            base_salary: d(base),
            meal_allowance: d("300"),
            pension_insurance: d("800"),
            medical_insurance: d("200"),
            housing_fund: d("600"),
            tax: d(tax),
            ..Default::default()
        }
    }
}
