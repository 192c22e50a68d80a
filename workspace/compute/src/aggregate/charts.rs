//! Chart series. These use the cash-only gross from
//! [`chart_gross`](crate::payroll::chart_gross) and its tax-free net.

use std::collections::BTreeMap;

use common::{
    DeductionFields, GrossVsNetPoint, IncomeFields, NetIncomePoint, Waterfall, WaterfallStep,
};
use model::entities::salary_record;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::chronological;
use crate::items::DeductionItem;
use crate::money::{quantize, Quantize};
use crate::payroll::{chart_gross, chart_net, total_deductions};

/// Net income and cash take-home summed per month across the record set.
#[instrument(skip(records), fields(num_records = records.len()))]
pub fn net_income_monthly(records: &[salary_record::Model]) -> Vec<NetIncomePoint> {
    let mut by_month: BTreeMap<(i32, i32), (Decimal, Decimal)> = BTreeMap::new();
    for derived in chronological(records) {
        let entry = by_month
            .entry((derived.record.year, derived.record.month))
            .or_default();
        entry.0 += derived.summary.net_income;
        entry.1 += derived.summary.actual_take_home;
    }

    by_month
        .into_iter()
        .map(|((year, month), (net, take_home))| NetIncomePoint {
            year,
            month,
            net_income: quantize(net),
            actual_take_home: quantize(take_home),
        })
        .collect()
}

/// Chart gross against chart net, summed per month.
#[instrument(skip(records), fields(num_records = records.len()))]
pub fn gross_vs_net_monthly(records: &[salary_record::Model]) -> Vec<GrossVsNetPoint> {
    let mut by_month: BTreeMap<(i32, i32), (IncomeFields, DeductionFields)> = BTreeMap::new();
    for derived in chronological(records) {
        let entry = by_month
            .entry((derived.record.year, derived.record.month))
            .or_default();
        entry.0 += &derived.input.income;
        entry.1 += &derived.input.deductions;
    }

    let points: Vec<GrossVsNetPoint> = by_month
        .into_iter()
        .map(|((year, month), (income, deductions))| GrossVsNetPoint {
            year,
            month,
            chart_gross: chart_gross(&income),
            total_deductions: total_deductions(&deductions),
            chart_net: chart_net(&income, &deductions),
        })
        .collect();

    debug!("Computed {} gross/net points", points.len());
    points
}

/// Walk from chart gross down to chart net, one step per deduction category.
///
/// Step amounts are negative; `runningTotal` is the value after the step.
#[instrument(skip(records), fields(num_records = records.len()))]
pub fn waterfall(records: &[salary_record::Model]) -> Waterfall {
    let mut income = IncomeFields::default();
    let mut deductions = DeductionFields::default();
    for derived in chronological(records) {
        income += &derived.input.income;
        deductions += &derived.input.deductions;
    }
    let deductions = deductions.quantized();

    let gross = chart_gross(&income);
    let mut running_total = gross;
    let steps = DeductionItem::ALL
        .iter()
        .map(|item| {
            let amount = item.amount(&deductions);
            running_total = quantize(running_total - amount);
            WaterfallStep {
                label: item.label().to_string(),
                amount: quantize(-amount),
                running_total,
            }
        })
        .collect();

    debug!(%gross, net = %running_total, "Computed waterfall");
    Waterfall {
        chart_gross: gross,
        steps,
        chart_net: running_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::testing::{d, record};

    fn chart_record() -> salary_record::Model {
        salary_record::Model {
            id: 1,
            person_id: 1,
            year: 2024,
            month: 6,
            base_salary: d("10000"),
            performance_salary: d("2000"),
            high_temp_allowance: d("500"),
            computer_allowance: d("100"),
            meal_allowance: d("300"),
            dragon_boat_benefit: d("200"),
            other_income: d("500"),
            pension_insurance: d("800"),
            medical_insurance: d("200"),
            unemployment_insurance: d("60"),
            enterprise_annuity: d("400"),
            housing_fund: d("1200"),
            tax: d("345"),
            ..Default::default()
        }
    }

    #[test]
    fn test_waterfall_ends_at_chart_net() {
        let chart = waterfall(&[chart_record()]);
        assert_eq!(chart.chart_gross, d("13100.00"));
        assert_eq!(chart.chart_net, d("10440.00"));
        assert_eq!(chart.steps.len(), 7);
        assert_eq!(chart.steps[0].label, "Pension insurance");
        assert_eq!(chart.steps[0].amount, d("-800.00"));
        assert_eq!(chart.steps[0].running_total, d("12300.00"));
        assert_eq!(chart.steps[6].running_total, chart.chart_net);
    }

    #[test]
    fn test_gross_vs_net_ignores_tax_and_non_cash() {
        let points = gross_vs_net_monthly(&[chart_record()]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].chart_gross, d("13100.00"));
        assert_eq!(points[0].total_deductions, d("2660.00"));
        assert_eq!(points[0].chart_net, d("10440.00"));
    }

    #[test]
    fn test_net_income_monthly_sums_persons() {
        let records = vec![
            record(1, 1, 2024, 1, "10000", "100"),
            record(2, 2, 2024, 1, "5000", "0"),
            record(3, 1, 2024, 2, "10000", "100"),
        ];

        let points = net_income_monthly(&records);
        assert_eq!(points.len(), 2);
        // (10300 - 1600 - 100) + (5300 - 1600)
        assert_eq!(points[0].net_income, d("12300.00"));
        assert_eq!(points[0].actual_take_home, d("11700.00"));
        assert_eq!(points[1].month, 2);
    }
}
