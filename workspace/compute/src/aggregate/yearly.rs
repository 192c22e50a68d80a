use std::collections::BTreeMap;

use common::{FamilySummary, PayrollSummary, PersonNetTotal, YearlyStats};
use model::entities::{person, salary_record};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::chronological;
use crate::money::{average, quantize};
use crate::payroll::{allowances_total, benefits_total, insurance_total};

#[derive(Default)]
struct YearAccumulator {
    months: u32,
    summary: PayrollSummary,
    insurance: Decimal,
    allowances: Decimal,
    bonuses: Decimal,
}

/// Per-person sums over the records of `year`, ordered by person id.
#[instrument(skip(records), fields(num_records = records.len()))]
pub fn yearly_stats(records: &[salary_record::Model], year: i32) -> Vec<YearlyStats> {
    let mut by_person: BTreeMap<i32, YearAccumulator> = BTreeMap::new();

    for derived in chronological(records)
        .iter()
        .filter(|derived| derived.record.year == year)
    {
        let acc = by_person.entry(derived.record.person_id).or_default();
        acc.months += 1;
        acc.summary += &derived.summary;
        acc.insurance += insurance_total(&derived.input.deductions);
        acc.allowances += allowances_total(&derived.input.income);
        acc.bonuses += benefits_total(&derived.input.income);
    }

    let stats: Vec<YearlyStats> = by_person
        .into_iter()
        .map(|(person_id, acc)| YearlyStats {
            person_id,
            year,
            months: acc.months,
            total_gross: quantize(acc.summary.gross_income),
            total_net: quantize(acc.summary.net_income),
            avg_net: average(acc.summary.net_income, acc.months),
            insurance_total: quantize(acc.insurance),
            tax_total: quantize(acc.summary.tax),
            allowances_total: quantize(acc.allowances),
            bonuses_total: quantize(acc.bonuses),
            actual_take_home_total: quantize(acc.summary.actual_take_home),
            non_cash_benefits_total: quantize(acc.summary.non_cash_benefits),
        })
        .collect();

    debug!("Computed yearly stats for {} persons", stats.len());
    stats
}

/// Household totals for `year`.
///
/// Records of persons not in `persons` are ignored. Every person appears in
/// `by_person`, with a zero total when they have no records.
#[instrument(skip(persons, records), fields(num_persons = persons.len(), num_records = records.len()))]
pub fn family_summary(
    year: i32,
    persons: &[person::Model],
    records: &[salary_record::Model],
) -> FamilySummary {
    let mut net_by_person: BTreeMap<i32, Decimal> =
        persons.iter().map(|person| (person.id, Decimal::ZERO)).collect();
    let mut summary = PayrollSummary::default();
    let mut insurance = Decimal::ZERO;

    for derived in chronological(records)
        .iter()
        .filter(|derived| derived.record.year == year)
    {
        let Some(net) = net_by_person.get_mut(&derived.record.person_id) else {
            continue;
        };
        *net += derived.summary.net_income;
        summary += &derived.summary;
        insurance += insurance_total(&derived.input.deductions);
    }

    let by_person = persons
        .iter()
        .map(|person| PersonNetTotal {
            person_id: person.id,
            name: person.name.clone(),
            total_net: quantize(net_by_person.get(&person.id).copied().unwrap_or_default()),
        })
        .collect();

    FamilySummary {
        year,
        persons: persons.len() as u32,
        total_gross: quantize(summary.gross_income),
        total_net: quantize(summary.net_income),
        insurance_total: quantize(insurance),
        tax_total: quantize(summary.tax),
        by_person,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::testing::{d, person, record};

    #[test]
    fn test_yearly_stats_per_person() {
        let records = vec![
            record(1, 1, 2024, 1, "10000", "100"),
            record(2, 1, 2024, 2, "10000", "200"),
            record(3, 1, 2023, 12, "99999", "0"),
            record(4, 2, 2024, 1, "5000", "0"),
        ];

        let stats = yearly_stats(&records, 2024);
        assert_eq!(stats.len(), 2);

        let first = &stats[0];
        assert_eq!(first.person_id, 1);
        assert_eq!(first.months, 2);
        assert_eq!(first.total_gross, d("20600.00"));
        // (10300 - 1600 - 100) + (10300 - 1600 - 200)
        assert_eq!(first.total_net, d("17100.00"));
        assert_eq!(first.avg_net, d("8550.00"));
        assert_eq!(first.tax_total, d("300.00"));
        assert_eq!(first.insurance_total, d("2000.00"));
        assert_eq!(first.allowances_total, d("600.00"));
        assert_eq!(first.bonuses_total, d("0.00"));
        assert_eq!(first.actual_take_home_total, d("16500.00"));
        assert_eq!(first.non_cash_benefits_total, d("600.00"));
    }

    #[test]
    fn test_yearly_stats_without_records_is_empty() {
        assert!(yearly_stats(&[], 2024).is_empty());
    }

    #[test]
    fn test_family_summary_lists_every_person() {
        let persons = vec![person(1, "Alice"), person(2, "Bob")];
        let records = vec![
            record(1, 1, 2024, 1, "10000", "100"),
            record(2, 1, 2024, 2, "10000", "100"),
            record(3, 1, 2023, 5, "10000", "100"),
            // Not one of the listed persons
            record(4, 9, 2024, 1, "10000", "100"),
        ];

        let summary = family_summary(2024, &persons, &records);
        assert_eq!(summary.persons, 2);
        assert_eq!(summary.total_gross, d("20600.00"));
        assert_eq!(summary.total_net, d("17200.00"));
        assert_eq!(summary.tax_total, d("200.00"));
        assert_eq!(summary.insurance_total, d("2000.00"));

        assert_eq!(summary.by_person.len(), 2);
        assert_eq!(summary.by_person[0].name, "Alice");
        assert_eq!(summary.by_person[0].total_net, d("17200.00"));
        assert_eq!(summary.by_person[1].total_net, d("0.00"));
        assert_eq!(summary.by_person[1].total_net.to_string(), "0.00");
    }
}
