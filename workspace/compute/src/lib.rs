//! Pure payroll engine: per-record derivation, aggregation views and
//! category statistics. Nothing here touches storage or authentication.

pub mod aggregate;
pub mod categories;
pub mod error;
pub mod items;
pub mod money;
pub mod payroll;
pub mod period;

pub use error::{ComputeError, Result};
pub use payroll::{compute_payroll, PayrollCalculator, PayrollInput, TaxBracket, TaxSchedule};
pub use period::{parse_range, PeriodRange};

/// Returns the calculator used by the request layer: the illustrative
/// progressive schedule with a 5000 monthly exemption.
pub fn default_calculator() -> PayrollCalculator {
    PayrollCalculator::new(TaxSchedule::default())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use common::{DeductionFields, IncomeFields};
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_default_calculator_applies_exemption() {
        let calculator = default_calculator();
        assert_eq!(calculator.schedule().exemption, Decimal::from(5000));

        let input = PayrollInput::new(
            IncomeFields {
                base_salary: Decimal::new(8000, 0),
                ..Default::default()
            },
            DeductionFields::default(),
            Decimal::ZERO,
        )
        .with_auto_tax(true);

        // 3% of 3000
        let summary = calculator.compute(&input);
        assert_eq!(summary.tax, Decimal::from_str("90.00").unwrap());
    }
}
