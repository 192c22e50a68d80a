use common::{MonthlyStats, SalaryRecordView};
use model::entities::salary_record;
use tracing::{debug, instrument};

use super::{chronological, Derived};
use crate::money::quantize;
use crate::payroll::{allowances_total, benefits_total, insurance_total};

pub(crate) fn view_of(derived: &Derived<'_>) -> SalaryRecordView {
    let record = derived.record;
    SalaryRecordView {
        id: record.id,
        person_id: record.person_id,
        year: record.year,
        month: record.month,
        income: derived.input.income.clone(),
        deductions: derived.input.deductions.clone(),
        note: record.note.clone(),
        summary: derived.summary.clone(),
    }
}

/// A stored record rendered with its derived payroll values.
pub fn salary_record_view(record: &salary_record::Model) -> SalaryRecordView {
    view_of(&Derived::new(record))
}

/// One row per record, in chronological order.
#[instrument(skip(records), fields(num_records = records.len()))]
pub fn monthly_stats(records: &[salary_record::Model]) -> Vec<MonthlyStats> {
    let stats: Vec<MonthlyStats> = chronological(records)
        .iter()
        .map(|derived| {
            let income = &derived.input.income;
            MonthlyStats {
                id: derived.record.id,
                person_id: derived.record.person_id,
                year: derived.record.year,
                month: derived.record.month,
                base_salary: quantize(income.base_salary),
                performance: quantize(income.performance_salary),
                allowances_total: allowances_total(income),
                bonuses_total: benefits_total(income),
                insurance_total: insurance_total(&derived.input.deductions),
                summary: derived.summary.clone(),
            }
        })
        .collect();

    debug!("Computed {} monthly rows", stats.len());
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::testing::{d, record};

    #[test]
    fn test_monthly_stats_are_chronological() {
        let records = vec![
            record(1, 1, 2024, 2, "10000", "100"),
            record(2, 1, 2023, 12, "9000", "50"),
            record(3, 2, 2024, 1, "8000", "0"),
        ];

        let stats = monthly_stats(&records);
        let order: Vec<(i32, i32)> = stats.iter().map(|s| (s.year, s.month)).collect();
        assert_eq!(order, vec![(2023, 12), (2024, 1), (2024, 2)]);
        let ids: Vec<i32> = stats.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        let feb = &stats[2];
        assert_eq!(feb.base_salary, d("10000.00"));
        assert_eq!(feb.allowances_total, d("300.00"));
        assert_eq!(feb.bonuses_total, d("0.00"));
        assert_eq!(feb.insurance_total, d("1000.00"));
        assert_eq!(feb.summary.net_income, d("8600.00"));
        assert_eq!(feb.summary.actual_take_home, d("8300.00"));
    }

    #[test]
    fn test_record_view_keeps_stored_fields() {
        let mut stored = record(7, 3, 2024, 5, "5000.5", "12");
        stored.note = Some("bonus month".to_string());

        let view = salary_record_view(&stored);
        assert_eq!(view.id, 7);
        assert_eq!(view.income.base_salary.to_string(), "5000.50");
        assert_eq!(view.deductions.housing_fund, d("600"));
        assert_eq!(view.note.as_deref(), Some("bonus month"));
        assert_eq!(view.summary.tax, d("12.00"));
    }
}
