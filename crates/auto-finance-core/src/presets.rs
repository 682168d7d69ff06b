//! Showroom defaults and slider bounds for the EMI calculator.
//!
//! The calculator opens with a 20% down payment, a 5-year tenure and an
//! 8.5% rate. Sliders bound the down payment to 10%-50% of the vehicle price
//! in steps of 10,000, the tenure to 1-7 years and the rate to 7%-15% in
//! steps of 0.1.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::emi::calculator::{compute_emi_with, validate_vehicle_inputs, LoanInputs, LoanResult};
use crate::error::AutoFinanceError;
use crate::types::*;
use crate::AutoFinanceResult;

pub const DEFAULT_ANNUAL_RATE_PERCENT: Percent = dec!(8.5);
pub const DEFAULT_TENURE_YEARS: u32 = 5;
pub const DEFAULT_DOWN_PAYMENT_FRACTION: Rate = dec!(0.20);
pub const MIN_DOWN_PAYMENT_FRACTION: Rate = dec!(0.10);
pub const MAX_DOWN_PAYMENT_FRACTION: Rate = dec!(0.50);
pub const DOWN_PAYMENT_STEP: Money = dec!(10000);

pub const TENURE_YEARS_RANGE: SliderRange = SliderRange {
    min: dec!(1),
    max: dec!(7),
    step: dec!(1),
};

pub const INTEREST_RATE_RANGE: SliderRange = SliderRange {
    min: dec!(7),
    max: dec!(15),
    step: dec!(0.1),
};

/// Inclusive bounds and step of a range slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

impl SliderRange {
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }

    /// Bound `value` to the range and snap it to the nearest step above `min`.
    pub fn clamp(&self, value: Decimal) -> Decimal {
        if value <= self.min {
            return self.min;
        }
        if value >= self.max {
            return self.max;
        }
        if self.step <= Decimal::ZERO {
            return value;
        }
        let steps = round_currency((value - self.min) / self.step);
        (self.min + steps * self.step).min(self.max)
    }
}

/// Down payment slider for a given vehicle price
pub fn down_payment_range(vehicle_price: Money) -> SliderRange {
    SliderRange {
        min: round_currency(vehicle_price * MIN_DOWN_PAYMENT_FRACTION),
        max: round_currency(vehicle_price * MAX_DOWN_PAYMENT_FRACTION),
        step: DOWN_PAYMENT_STEP,
    }
}

/// Down payment as a whole percentage of the vehicle price
pub fn down_payment_percent(vehicle_price: Money, down_payment: Money) -> AutoFinanceResult<Decimal> {
    if vehicle_price.is_zero() {
        return Err(AutoFinanceError::DivisionByZero {
            context: "down payment percentage".into(),
        });
    }
    Ok(round_currency(down_payment / vehicle_price * dec!(100)))
}

/// Inputs the calculator opens with for a vehicle
pub fn default_inputs(vehicle_price: Money) -> LoanInputs {
    LoanInputs {
        vehicle_price,
        down_payment: round_currency(vehicle_price * DEFAULT_DOWN_PAYMENT_FRACTION),
        annual_rate_percent: DEFAULT_ANNUAL_RATE_PERCENT,
        tenure_years: DEFAULT_TENURE_YEARS,
        rounding: RoundingPolicy::default(),
    }
}

/// Everything the calculator panel shows for one set of inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanQuote {
    pub inputs: LoanInputs,
    pub down_payment_percent: Decimal,
    pub down_payment_range: SliderRange,
    pub tenure_years_range: SliderRange,
    pub interest_rate_range: SliderRange,
    pub loan: LoanResult,
}

/// Quote with the opening defaults for `vehicle_price`.
///
/// The defaults are used as-is; they are not snapped to the slider grid.
pub fn default_quote(vehicle_price: Money) -> AutoFinanceResult<ComputationOutput<LoanQuote>> {
    let start = Instant::now();
    let inputs = default_inputs(vehicle_price);
    let quote = build_quote(inputs)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Showroom EMI quote (opening defaults)",
        &serde_json::json!({
            "vehicle_price": vehicle_price.to_string(),
            "down_payment_fraction": DEFAULT_DOWN_PAYMENT_FRACTION.to_string(),
            "annual_rate_percent": DEFAULT_ANNUAL_RATE_PERCENT.to_string(),
            "tenure_years": DEFAULT_TENURE_YEARS,
        }),
        Vec::new(),
        elapsed,
        quote,
    ))
}

/// Quote after moving each slider to the requested value.
///
/// Values outside a slider are clamped and snapped the way the range input
/// would; every adjustment is reported as a warning.
pub fn showroom_quote(input: &LoanInputs) -> AutoFinanceResult<ComputationOutput<LoanQuote>> {
    let start = Instant::now();
    validate_vehicle_inputs(input)?;

    let mut warnings: Vec<String> = Vec::new();
    let mut inputs = input.clone();

    let dp_range = down_payment_range(input.vehicle_price);
    inputs.down_payment = dp_range.clamp(input.down_payment);
    if inputs.down_payment != input.down_payment {
        warnings.push(format!(
            "Down payment {} adjusted to {} (slider {}-{}, step {})",
            input.down_payment, inputs.down_payment, dp_range.min, dp_range.max, dp_range.step
        ));
    }

    let tenure = TENURE_YEARS_RANGE.clamp(Decimal::from(input.tenure_years));
    inputs.tenure_years = tenure.to_u32().ok_or_else(|| {
        AutoFinanceError::invalid("tenure_years", format!("{tenure} is not a whole year count"))
    })?;
    if inputs.tenure_years != input.tenure_years {
        warnings.push(format!(
            "Tenure {} years adjusted to {} years",
            input.tenure_years, inputs.tenure_years
        ));
    }

    inputs.annual_rate_percent = INTEREST_RATE_RANGE.clamp(input.annual_rate_percent);
    if inputs.annual_rate_percent != input.annual_rate_percent {
        warnings.push(format!(
            "Annual rate {}% adjusted to {}%",
            input.annual_rate_percent, inputs.annual_rate_percent
        ));
    }

    let quote = build_quote(inputs)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Showroom EMI quote (slider-bounded inputs)",
        &serde_json::json!({
            "vehicle_price": input.vehicle_price.to_string(),
            "down_payment": input.down_payment.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "tenure_years": input.tenure_years,
        }),
        warnings,
        elapsed,
        quote,
    ))
}

fn build_quote(inputs: LoanInputs) -> AutoFinanceResult<LoanQuote> {
    validate_vehicle_inputs(&inputs)?;
    let loan = compute_emi_with(
        inputs.principal(),
        inputs.annual_rate_percent,
        inputs.tenure_years,
        inputs.rounding,
    )?;

    Ok(LoanQuote {
        down_payment_percent: down_payment_percent(inputs.vehicle_price, inputs.down_payment)?,
        down_payment_range: down_payment_range(inputs.vehicle_price),
        tenure_years_range: TENURE_YEARS_RANGE,
        interest_rate_range: INTEREST_RATE_RANGE,
        inputs,
        loan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_inputs() {
        let inputs = default_inputs(dec!(1411000));
        assert_eq!(inputs.down_payment, dec!(282200));
        assert_eq!(inputs.tenure_years, 5);
        assert_eq!(inputs.annual_rate_percent, dec!(8.5));
    }

    #[test]
    fn test_down_payment_range() {
        let range = down_payment_range(dec!(1044000));
        assert_eq!(range.min, dec!(104400));
        assert_eq!(range.max, dec!(522000));
        assert_eq!(range.step, dec!(10000));
    }

    #[test]
    fn test_clamp_bounds_and_snaps() {
        assert_eq!(INTEREST_RATE_RANGE.clamp(dec!(5)), dec!(7));
        assert_eq!(INTEREST_RATE_RANGE.clamp(dec!(20)), dec!(15));
        assert_eq!(INTEREST_RATE_RANGE.clamp(dec!(9.26)), dec!(9.3));
        assert_eq!(TENURE_YEARS_RANGE.clamp(dec!(3)), dec!(3));

        let range = down_payment_range(dec!(1000000));
        assert_eq!(range.clamp(dec!(203000)), dec!(200000));
        assert_eq!(range.clamp(dec!(207000)), dec!(210000));
    }

    #[test]
    fn test_down_payment_percent() {
        assert_eq!(down_payment_percent(dec!(1411000), dec!(282200)).unwrap(), dec!(20));
        assert_eq!(down_payment_percent(dec!(1000000), dec!(155000)).unwrap(), dec!(16));
        assert!(down_payment_percent(Decimal::ZERO, dec!(1)).is_err());
    }

    #[test]
    fn test_default_quote() {
        let output = default_quote(dec!(1000000)).unwrap();
        let quote = &output.result;
        assert_eq!(quote.inputs.down_payment, dec!(200000));
        assert_eq!(quote.down_payment_percent, dec!(20));
        assert_eq!(quote.loan.principal, dec!(800000));
        assert_eq!(quote.loan.monthly_installment, dec!(16413));
    }

    #[test]
    fn test_showroom_quote_clamps_and_warns() {
        let input = LoanInputs {
            vehicle_price: dec!(1000000),
            down_payment: dec!(50000),
            annual_rate_percent: dec!(20),
            tenure_years: 10,
            rounding: RoundingPolicy::default(),
        };
        let output = showroom_quote(&input).unwrap();
        let quote = &output.result;
        assert_eq!(quote.inputs.down_payment, dec!(100000));
        assert_eq!(quote.inputs.tenure_years, 7);
        assert_eq!(quote.inputs.annual_rate_percent, dec!(15));
        assert_eq!(output.warnings.len(), 3);
    }

    #[test]
    fn test_showroom_quote_keeps_in_range_inputs() {
        let output = showroom_quote(&default_inputs(dec!(1000000))).unwrap();
        assert!(output.warnings.is_empty());
        assert_eq!(output.result.loan.principal, dec!(800000));
    }
}
