use std::collections::BTreeMap;

use common::{AnnualMonthRow, AnnualTableRow, FieldTotals, SalaryRecordView};
use model::entities::salary_record;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::monthly::view_of;
use super::{chronological, Totals};
use crate::money::{quantize, Quantize};

/// One row per record with every stored and derived field, chronological.
#[instrument(skip(records), fields(num_records = records.len()))]
pub fn monthly_table(records: &[salary_record::Model]) -> Vec<SalaryRecordView> {
    chronological(records).iter().map(view_of).collect()
}

/// Percent change from `prior` to `current`; `None` unless `prior` is positive.
pub fn yoy_growth(current: Decimal, prior: Decimal) -> Option<Decimal> {
    if prior <= Decimal::ZERO {
        return None;
    }
    (current - prior)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(prior))
        .map(quantize)
}

/// Per-person field totals for `year`, with growth of net income against
/// `year - 1`. Pass records of both years; prior-year records only feed the
/// growth figure.
#[instrument(skip(records), fields(num_records = records.len()))]
pub fn annual_table(records: &[salary_record::Model], year: i32) -> Vec<AnnualTableRow> {
    let mut current: BTreeMap<i32, Totals> = BTreeMap::new();
    let mut prior_net: BTreeMap<i32, Decimal> = BTreeMap::new();

    for derived in chronological(records) {
        let person_id = derived.record.person_id;
        if derived.record.year == year {
            current.entry(person_id).or_default().add(&derived);
        } else if derived.record.year == year - 1 {
            *prior_net.entry(person_id).or_default() += derived.summary.net_income;
        }
    }

    let rows: Vec<AnnualTableRow> = current
        .into_iter()
        .map(|(person_id, totals)| {
            let (months, totals) = totals.finish();
            let prior = prior_net.get(&person_id).copied().unwrap_or_default();
            AnnualTableRow {
                person_id,
                year,
                months,
                yoy_growth: yoy_growth(totals.summary.net_income, prior),
                totals,
            }
        })
        .collect();

    debug!("Computed annual table with {} rows", rows.len());
    rows
}

/// Twelve month buckets of `year` summed across all given records.
///
/// Months without records are zero rows; `skip_empty` drops every row whose
/// totals are all zero.
#[instrument(skip(records), fields(num_records = records.len()))]
pub fn annual_monthly_table(
    records: &[salary_record::Model],
    year: i32,
    skip_empty: bool,
) -> Vec<AnnualMonthRow> {
    let mut buckets: BTreeMap<i32, Totals> = (1..=12).map(|month| (month, Totals::default())).collect();

    for derived in chronological(records) {
        if derived.record.year != year {
            continue;
        }
        if let Some(bucket) = buckets.get_mut(&derived.record.month) {
            bucket.add(&derived);
        }
    }

    let empty = FieldTotals::default().quantized();
    buckets
        .into_iter()
        .map(|(month, totals)| {
            let (count, totals) = totals.finish();
            AnnualMonthRow {
                month,
                records: count,
                totals,
            }
        })
        .filter(|row| !skip_empty || row.totals != empty)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::testing::{d, record};

    #[test]
    fn test_yoy_growth() {
        assert_eq!(yoy_growth(d("110"), d("100")), Some(d("10.00")));
        assert_eq!(yoy_growth(d("50"), d("100")), Some(d("-50.00")));
        assert_eq!(yoy_growth(d("100"), Decimal::ZERO), None);
        assert_eq!(yoy_growth(d("100"), d("-5")), None);
    }

    #[test]
    fn test_annual_table_with_growth() {
        let records = vec![
            // Person 1: 2023 net 8700, 2024 net 2 * 8700
            record(1, 1, 2023, 6, "10000", "0"),
            record(2, 1, 2024, 1, "10000", "0"),
            record(3, 1, 2024, 2, "10000", "0"),
            // Person 2 has no prior year
            record(4, 2, 2024, 1, "5000", "0"),
        ];

        let rows = annual_table(&records, 2024);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].person_id, 1);
        assert_eq!(rows[0].months, 2);
        assert_eq!(rows[0].totals.income.base_salary, d("20000.00"));
        assert_eq!(rows[0].totals.deductions.pension_insurance, d("1600.00"));
        assert_eq!(rows[0].totals.summary.net_income, d("17400.00"));
        assert_eq!(rows[0].yoy_growth, Some(d("100.00")));

        assert_eq!(rows[1].person_id, 2);
        assert_eq!(rows[1].yoy_growth, None);
    }

    #[test]
    fn test_annual_monthly_table_has_twelve_buckets() {
        let records = vec![
            record(1, 1, 2024, 3, "10000", "0"),
            record(2, 2, 2024, 3, "5000", "0"),
            record(3, 1, 2023, 3, "10000", "0"),
        ];

        let rows = annual_monthly_table(&records, 2024, false);
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].month, 1);
        assert_eq!(rows[0].records, 0);
        assert_eq!(rows[0].totals.summary.net_income.to_string(), "0.00");
        assert_eq!(rows[2].records, 2);
        assert_eq!(rows[2].totals.income.base_salary, d("15000.00"));

        let compact = annual_monthly_table(&records, 2024, true);
        assert_eq!(compact.len(), 1);
        assert_eq!(compact[0].month, 3);
    }

    #[test]
    fn test_monthly_table_is_chronological() {
        let records = vec![
            record(2, 1, 2024, 2, "10000", "0"),
            record(1, 1, 2024, 1, "10000", "0"),
        ];
        let rows = monthly_table(&records);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[1].id, 2);
    }
}
