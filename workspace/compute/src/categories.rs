//! Category usage statistics.
//!
//! Two record shapes are supported: the fixed income and deduction fields of
//! salary records, and free-form `name -> amount` maps such as the ones kept
//! on salary templates. Both go through the same per-category fold.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use common::{CategoryKind, CategoryStats, CategorySummary, CategoryTotals};
use model::entities::salary_record;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::items::{DeductionItem, IncomeItem};
use crate::money::{average, percent_of, quantize, sum};
use crate::payroll::{deductions_of, income_of};

/// A free-form category map.
pub type CategoryMap = BTreeMap<String, Decimal>;

/// Sort key for category statistics, always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryOrder {
    TotalAmount,
    UsageCount,
}

/// Stats of one category from its amount in each record (zero when absent).
fn category_stats<I>(name: &str, kind: CategoryKind, amounts: I, total_records: usize) -> CategoryStats
where
    I: IntoIterator<Item = Decimal>,
{
    let mut total = Decimal::ZERO;
    let mut usage_count = 0u32;
    for amount in amounts {
        total += amount;
        if amount > Decimal::ZERO {
            usage_count += 1;
        }
    }

    CategoryStats {
        category_name: name.to_string(),
        category_type: kind,
        total_amount: quantize(total),
        average_amount: average(total, usage_count),
        usage_count,
        usage_percentage: percent_of(Decimal::from(usage_count), Decimal::from(total_records)),
    }
}

fn sort_stats(stats: &mut [CategoryStats], order: CategoryOrder) {
    stats.sort_by(|a, b| {
        let primary = match order {
            CategoryOrder::TotalAmount => b.total_amount.cmp(&a.total_amount),
            CategoryOrder::UsageCount => b
                .usage_count
                .cmp(&a.usage_count)
                .then_with(|| b.total_amount.cmp(&a.total_amount)),
        };
        match primary {
            Ordering::Equal => a.category_name.cmp(&b.category_name),
            other => other,
        }
    });
}

/// Statistics of every fixed income and deduction item, by total descending.
#[instrument(skip(records), fields(num_records = records.len()))]
pub fn fixed_category_stats(records: &[salary_record::Model]) -> Vec<CategoryStats> {
    let incomes: Vec<_> = records.iter().map(income_of).collect();
    let deductions: Vec<_> = records.iter().map(deductions_of).collect();

    let mut stats: Vec<CategoryStats> = IncomeItem::ALL
        .iter()
        .map(|item| {
            category_stats(
                item.label(),
                CategoryKind::Income,
                incomes.iter().map(|income| item.amount(income)),
                records.len(),
            )
        })
        .chain(DeductionItem::ALL.iter().map(|item| {
            category_stats(
                item.label(),
                CategoryKind::Deduction,
                deductions.iter().map(|deduction| item.amount(deduction)),
                records.len(),
            )
        }))
        .collect();

    sort_stats(&mut stats, CategoryOrder::TotalAmount);
    debug!("Computed {} fixed category stats", stats.len());
    stats
}

/// Grand totals of the income and deduction items.
#[instrument(skip(records), fields(num_records = records.len()))]
pub fn category_summary(records: &[salary_record::Model]) -> CategorySummary {
    let income_total = sum(records.iter().flat_map(|record| {
        let income = income_of(record);
        IncomeItem::ALL.map(|item| item.amount(&income))
    }));
    let deduction_total = sum(records.iter().flat_map(|record| {
        let deductions = deductions_of(record);
        DeductionItem::ALL.map(|item| item.amount(&deductions))
    }));

    CategorySummary {
        income: CategoryTotals {
            total: income_total,
            categories_count: IncomeItem::ALL.len() as u32,
        },
        deductions: CategoryTotals {
            total: deduction_total,
            categories_count: DeductionItem::ALL.len() as u32,
        },
    }
}

/// Statistics of every category name found in `maps`.
///
/// Each map counts as one record, so usage percentages are relative to
/// `maps.len()`, empty maps included.
#[instrument(skip(maps), fields(num_maps = maps.len()))]
pub fn map_category_stats(
    maps: &[CategoryMap],
    kind: CategoryKind,
    order: CategoryOrder,
) -> Vec<CategoryStats> {
    let mut names: Vec<&String> = maps.iter().flat_map(|map| map.keys()).collect();
    names.sort();
    names.dedup();

    let mut stats: Vec<CategoryStats> = names
        .into_iter()
        .map(|name| {
            category_stats(
                name,
                kind,
                maps.iter()
                    .map(|map| map.get(name).copied().unwrap_or_default()),
                maps.len(),
            )
        })
        .collect();

    sort_stats(&mut stats, order);
    stats
}
