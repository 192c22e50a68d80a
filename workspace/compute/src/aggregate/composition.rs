use common::IncomeComposition;
use model::entities::salary_record;
use tracing::{debug, instrument};

use super::chronological;
use crate::money::{percent_of, quantize};
use crate::payroll::{allowances_total, benefits_total};

/// Share of each income group in a record's total income.
///
/// Groups: base salary, performance, allowances (temperature, computer and
/// meal), festival benefits, and other income. Percentages are zero when the
/// total is zero.
#[instrument(skip(records), fields(num_records = records.len()))]
pub fn income_composition(records: &[salary_record::Model]) -> Vec<IncomeComposition> {
    let rows: Vec<IncomeComposition> = chronological(records)
        .iter()
        .map(|derived| {
            let income = &derived.input.income;
            let total = derived.summary.total_income;
            let base_salary = quantize(income.base_salary);
            let performance = quantize(income.performance_salary);
            let allowances = allowances_total(income);
            let benefits = benefits_total(income);
            let other = quantize(income.other_income);

            IncomeComposition {
                person_id: derived.record.person_id,
                year: derived.record.year,
                month: derived.record.month,
                total_income: total,
                base_salary,
                performance,
                allowances,
                benefits,
                other,
                base_salary_percent: percent_of(base_salary, total),
                performance_percent: percent_of(performance, total),
                allowances_percent: percent_of(allowances, total),
                benefits_percent: percent_of(benefits, total),
                other_percent: percent_of(other, total),
            }
        })
        .collect();

    debug!("Computed composition for {} records", rows.len());
    rows
}
