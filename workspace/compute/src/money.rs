//! Fixed-point money helpers.
//!
//! Every monetary value leaving the engine goes through [`quantize`]: two
//! fractional digits, half-up rounding (away from zero for negatives).

use std::str::FromStr;

use common::{DeductionFields, FieldTotals, IncomeFields, PayrollSummary};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::error::{ComputeError, Result};
use crate::items::{DeductionItem, IncomeItem};

/// Number of fractional digits kept for every amount.
pub const MONEY_SCALE: u32 = 2;

/// Exclusive magnitude bound of a stored amount: 13 integer digits.
pub const AMOUNT_LIMIT: i64 = 10_000_000_000_000;

/// Rejects amounts whose magnitude reaches [`AMOUNT_LIMIT`].
///
/// Sums of a record's items stay far below `Decimal::MAX` once every item
/// passes this check.
pub fn bounded(field: &str, value: Decimal) -> Result<Decimal> {
    if value.abs() >= Decimal::from(AMOUNT_LIMIT) {
        warn!(field, %value, "Rejecting oversized amount");
        return Err(ComputeError::AmountOutOfRange(format!("{field}={value}")));
    }
    Ok(value)
}

/// Checks every monetary field of a value against [`AMOUNT_LIMIT`].
pub trait CheckBounds {
    fn check_bounds(&self) -> Result<()>;
}

impl CheckBounds for IncomeFields {
    fn check_bounds(&self) -> Result<()> {
        for item in IncomeItem::ALL {
            bounded(item.key(), item.amount(self))?;
        }
        Ok(())
    }
}

impl CheckBounds for DeductionFields {
    fn check_bounds(&self) -> Result<()> {
        for item in DeductionItem::ALL {
            bounded(item.key(), item.amount(self))?;
        }
        Ok(())
    }
}

/// Rounds to [`MONEY_SCALE`] digits and pads so the scale is exactly 2.
pub fn quantize(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Quantized sum of the given amounts.
pub fn sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    quantize(values.into_iter().sum())
}

/// `part / whole * 100`, quantized. Zero when `whole` is zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return quantize(Decimal::ZERO);
    }
    let percent = part
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .unwrap_or(Decimal::ZERO);
    quantize(percent)
}

/// `total / count`, quantized. Zero when `count` is zero.
pub fn average(total: Decimal, count: u32) -> Decimal {
    if count == 0 {
        return quantize(Decimal::ZERO);
    }
    quantize(total / Decimal::from(count))
}

/// Canonicalizes a raw numeric input to a quantized amount.
pub trait ToMoney {
    fn to_money(&self) -> Result<Decimal>;
}

impl ToMoney for Decimal {
    fn to_money(&self) -> Result<Decimal> {
        bounded("amount", *self).map(quantize)
    }
}

macro_rules! int_to_money {
    ($($ty:ty),*) => {
        $(
            impl ToMoney for $ty {
                fn to_money(&self) -> Result<Decimal> {
                    bounded("amount", Decimal::from(*self)).map(quantize)
                }
            }
        )*
    };
}

int_to_money!(i32, i64, u32, u64);

impl ToMoney for f64 {
    /// Goes through the shortest decimal text of the float, so `0.1` becomes
    /// exactly `0.10` instead of its binary expansion.
    fn to_money(&self) -> Result<Decimal> {
        if !self.is_finite() {
            warn!(value = %self, "Rejecting non-finite amount");
            return Err(ComputeError::InvalidAmount(self.to_string()));
        }
        self.to_string().as_str().to_money()
    }
}

impl ToMoney for str {
    /// Blank text reads as zero.
    fn to_money(&self) -> Result<Decimal> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return Ok(quantize(Decimal::ZERO));
        }
        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| ComputeError::InvalidAmount(trimmed.to_string()))?;
        bounded("amount", value).map(quantize)
    }
}

impl ToMoney for String {
    fn to_money(&self) -> Result<Decimal> {
        self.as_str().to_money()
    }
}

/// Quantizes every monetary field of a value.
pub trait Quantize {
    fn quantized(self) -> Self;
}

impl Quantize for Decimal {
    fn quantized(self) -> Self {
        quantize(self)
    }
}

impl Quantize for IncomeFields {
    fn quantized(self) -> Self {
        IncomeFields {
            base_salary: quantize(self.base_salary),
            performance_salary: quantize(self.performance_salary),
            high_temp_allowance: quantize(self.high_temp_allowance),
            low_temp_allowance: quantize(self.low_temp_allowance),
            computer_allowance: quantize(self.computer_allowance),
            meal_allowance: quantize(self.meal_allowance),
            mid_autumn_benefit: quantize(self.mid_autumn_benefit),
            dragon_boat_benefit: quantize(self.dragon_boat_benefit),
            spring_festival_benefit: quantize(self.spring_festival_benefit),
            other_income: quantize(self.other_income),
        }
    }
}

impl Quantize for DeductionFields {
    fn quantized(self) -> Self {
        DeductionFields {
            pension_insurance: quantize(self.pension_insurance),
            medical_insurance: quantize(self.medical_insurance),
            unemployment_insurance: quantize(self.unemployment_insurance),
            critical_illness_insurance: quantize(self.critical_illness_insurance),
            enterprise_annuity: quantize(self.enterprise_annuity),
            housing_fund: quantize(self.housing_fund),
            other_deductions: quantize(self.other_deductions),
        }
    }
}

impl Quantize for PayrollSummary {
    fn quantized(self) -> Self {
        PayrollSummary {
            total_income: quantize(self.total_income),
            total_deductions: quantize(self.total_deductions),
            gross_income: quantize(self.gross_income),
            tax: quantize(self.tax),
            net_income: quantize(self.net_income),
            actual_take_home: quantize(self.actual_take_home),
            non_cash_benefits: quantize(self.non_cash_benefits),
        }
    }
}

impl Quantize for FieldTotals {
    fn quantized(self) -> Self {
        FieldTotals {
            income: self.income.quantized(),
            deductions: self.deductions.quantized(),
            summary: self.summary.quantized(),
        }
    }
}
