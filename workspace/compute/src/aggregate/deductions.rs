use std::collections::BTreeMap;

use common::{DeductionFields, DeductionShare, DeductionsBreakdown, MonthlyDeductions};
use model::entities::salary_record;
use tracing::{debug, instrument};

use super::chronological;
use crate::items::DeductionItem;
use crate::money::{percent_of, Quantize};
use crate::payroll::total_deductions;

/// Per-category deduction totals with their share of the grand total, plus
/// the same categories summed per month.
#[instrument(skip(records), fields(num_records = records.len()))]
pub fn deductions_breakdown(records: &[salary_record::Model]) -> DeductionsBreakdown {
    let mut overall = DeductionFields::default();
    let mut by_month: BTreeMap<(i32, i32), DeductionFields> = BTreeMap::new();

    for derived in chronological(records) {
        let deductions = &derived.input.deductions;
        overall += deductions;
        *by_month
            .entry((derived.record.year, derived.record.month))
            .or_default() += deductions;
    }

    let overall = overall.quantized();
    let total = total_deductions(&overall);

    let summary = DeductionItem::ALL
        .iter()
        .map(|item| {
            let amount = item.amount(&overall);
            DeductionShare {
                category: item.key().to_string(),
                amount,
                percent: percent_of(amount, total),
            }
        })
        .collect();

    let monthly: Vec<MonthlyDeductions> = by_month
        .into_iter()
        .map(|((year, month), deductions)| {
            let deductions = deductions.quantized();
            MonthlyDeductions {
                year,
                month,
                total: total_deductions(&deductions),
                deductions,
            }
        })
        .collect();

    debug!(%total, months = monthly.len(), "Computed deductions breakdown");
    DeductionsBreakdown {
        total,
        summary,
        monthly,
    }
}
