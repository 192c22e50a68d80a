use common::ContributionPoint;
use model::entities::{person, salary_record};
use tracing::{debug, instrument};

use super::chronological;
use crate::money::quantize;
use crate::period::PeriodRange;

/// Running pension, medical and housing fund totals for one person.
///
/// Totals start from the person's history fields. Records before `range`
/// are folded into that seed without producing points, records inside it
/// produce one point each, and records after it are ignored. Records of
/// other persons are skipped.
#[instrument(skip(person, records), fields(person_id = person.id, num_records = records.len()))]
pub fn cumulative_contributions(
    person: &person::Model,
    records: &[salary_record::Model],
    range: &PeriodRange,
) -> Vec<ContributionPoint> {
    let own: Vec<salary_record::Model> = records
        .iter()
        .filter(|record| record.person_id == person.id)
        .cloned()
        .collect();

    let mut pension = quantize(person.pension_history);
    let mut medical = quantize(person.medical_history);
    let mut housing_fund = quantize(person.housing_fund_history);
    let mut points = Vec::new();

    for derived in chronological(&own) {
        let (year, month) = (derived.record.year, derived.record.month);
        let deductions = &derived.input.deductions;

        if range.is_before(year, month) {
            pension += deductions.pension_insurance;
            medical += deductions.medical_insurance;
            housing_fund += deductions.housing_fund;
            continue;
        }
        if !range.contains(year, month) {
            continue;
        }

        pension += deductions.pension_insurance;
        medical += deductions.medical_insurance;
        housing_fund += deductions.housing_fund;

        points.push(ContributionPoint {
            year,
            month,
            pension: deductions.pension_insurance,
            medical: deductions.medical_insurance,
            housing_fund: deductions.housing_fund,
            pension_cumulative: quantize(pension),
            medical_cumulative: quantize(medical),
            housing_fund_cumulative: quantize(housing_fund),
        });
    }

    debug!("Computed {} contribution points", points.len());
    points
}
