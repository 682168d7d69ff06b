use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::AutoFinanceError;
use crate::presets::{
    down_payment_percent, down_payment_range, INTEREST_RATE_RANGE, TENURE_YEARS_RANGE,
};
use crate::time_value::{level_payment, monthly_rate, MONTHS_PER_YEAR};
use crate::types::*;
use crate::AutoFinanceResult;

/// Vehicle-level loan inputs, as captured by the showroom calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInputs {
    pub vehicle_price: Money,
    pub down_payment: Money,
    /// Annual nominal rate as a percentage (8.5 = 8.5% p.a.)
    pub annual_rate_percent: Percent,
    pub tenure_years: u32,
    #[serde(default)]
    pub rounding: RoundingPolicy,
}

impl LoanInputs {
    /// Amount financed
    pub fn principal(&self) -> Money {
        self.vehicle_price - self.down_payment
    }
}

/// Installment and totals for a fixed-rate amortising loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub principal: Money,
    pub tenure_months: u32,
    pub monthly_rate: Rate,
    /// Installment in whole currency units
    pub monthly_installment: Money,
    /// Installment before display rounding
    pub exact_monthly_installment: Money,
    pub total_payable: Money,
    pub total_interest: Money,
}

/// Fixed monthly installment (EMI) for `principal` at `annual_rate_percent`
/// over `tenure_years`, rounded the way the showroom displays it.
pub fn compute_emi(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_years: u32,
) -> AutoFinanceResult<LoanResult> {
    compute_emi_with(
        principal,
        annual_rate_percent,
        tenure_years,
        RoundingPolicy::default(),
    )
}

/// [`compute_emi`] with an explicit rounding policy for the totals.
pub fn compute_emi_with(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_years: u32,
    rounding: RoundingPolicy,
) -> AutoFinanceResult<LoanResult> {
    if principal <= Decimal::ZERO {
        return Err(AutoFinanceError::invalid(
            "principal",
            "Loan principal must be positive",
        ));
    }
    if tenure_years == 0 {
        return Err(AutoFinanceError::invalid(
            "tenure_years",
            "Tenure must be at least 1 year",
        ));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(AutoFinanceError::invalid(
            "annual_rate_percent",
            "Interest rate cannot be negative",
        ));
    }

    let tenure_months = tenure_years.checked_mul(MONTHS_PER_YEAR).ok_or_else(|| {
        AutoFinanceError::invalid("tenure_years", format!("{tenure_years} years is out of range"))
    })?;
    let months = Decimal::from(tenure_months);

    let rate = monthly_rate(annual_rate_percent);
    let exact = level_payment(rate, tenure_months, principal)?;
    let monthly_installment = covering_installment(exact, principal, months)?;

    let (total_payable, total_interest) = match rounding {
        RoundingPolicy::RoundThenMultiply if rate.is_zero() => {
            // Without compounding the unrounded installment repays the principal exactly.
            (principal, Decimal::ZERO)
        }
        RoundingPolicy::RoundThenMultiply => {
            let total = monthly_installment
                .checked_mul(months)
                .ok_or_else(|| overflow("total_payable"))?;
            (total, round_currency(total - principal))
        }
        RoundingPolicy::CarryPrecision => {
            let total = exact
                .checked_mul(months)
                .ok_or_else(|| overflow("total_payable"))?;
            let mut rounded = round_currency(total);
            if rounded < principal {
                rounded = total.ceil();
            }
            (rounded, round_currency(total - principal))
        }
    };

    debug!(
        %principal,
        %annual_rate_percent,
        tenure_months,
        %monthly_installment,
        ?rounding,
        "computed EMI"
    );

    Ok(LoanResult {
        principal,
        tenure_months,
        monthly_rate: rate,
        monthly_installment,
        exact_monthly_installment: exact,
        total_payable,
        total_interest,
    })
}

/// Installment in whole currency units that still repays the principal over
/// `months`: nearest unit, or the next unit up when the nearest falls short.
fn covering_installment(
    exact: Money,
    principal: Money,
    months: Decimal,
) -> AutoFinanceResult<Money> {
    let rounded = round_currency(exact);
    let repaid = rounded
        .checked_mul(months)
        .ok_or_else(|| overflow("monthly_installment"))?;
    if repaid >= principal {
        Ok(rounded)
    } else {
        Ok(exact.ceil())
    }
}

fn overflow(field: &str) -> AutoFinanceError {
    AutoFinanceError::invalid(field, "Amount is too large to compute")
}

/// Validate vehicle-level inputs, derive the principal and compute the EMI.
pub fn calculate_loan(input: &LoanInputs) -> AutoFinanceResult<ComputationOutput<LoanResult>> {
    let start = Instant::now();

    validate_vehicle_inputs(input)?;

    let result = compute_emi_with(
        input.principal(),
        input.annual_rate_percent,
        input.tenure_years,
        input.rounding,
    )?;

    let warnings = showroom_range_warnings(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate EMI (reducing balance, monthly compounding)",
        &serde_json::json!({
            "vehicle_price": input.vehicle_price.to_string(),
            "down_payment": input.down_payment.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "tenure_years": input.tenure_years,
            "rounding": input.rounding,
        }),
        warnings,
        elapsed,
        result,
    ))
}

pub(crate) fn validate_vehicle_inputs(input: &LoanInputs) -> AutoFinanceResult<()> {
    if input.vehicle_price <= Decimal::ZERO {
        return Err(AutoFinanceError::invalid(
            "vehicle_price",
            "Vehicle price must be positive",
        ));
    }
    if input.down_payment < Decimal::ZERO {
        return Err(AutoFinanceError::invalid(
            "down_payment",
            "Down payment cannot be negative",
        ));
    }
    if input.down_payment >= input.vehicle_price {
        return Err(AutoFinanceError::invalid(
            "down_payment",
            "Down payment must be less than the vehicle price",
        ));
    }
    Ok(())
}

/// Advisory notes for inputs the showroom sliders would never produce.
pub(crate) fn showroom_range_warnings(input: &LoanInputs) -> AutoFinanceResult<Vec<String>> {
    let mut warnings = Vec::new();

    if !INTEREST_RATE_RANGE.contains(input.annual_rate_percent) {
        warnings.push(format!(
            "Annual rate of {}% is outside the showroom range of {}%-{}%",
            input.annual_rate_percent, INTEREST_RATE_RANGE.min, INTEREST_RATE_RANGE.max
        ));
    }
    if !TENURE_YEARS_RANGE.contains(Decimal::from(input.tenure_years)) {
        warnings.push(format!(
            "Tenure of {} years is outside the showroom range of {}-{} years",
            input.tenure_years, TENURE_YEARS_RANGE.min, TENURE_YEARS_RANGE.max
        ));
    }

    let slider = down_payment_range(input.vehicle_price);
    if !slider.contains(input.down_payment) {
        warnings.push(format!(
            "Down payment of {} ({}%) is outside the showroom range of {}-{}",
            input.down_payment,
            down_payment_percent(input.vehicle_price, input.down_payment)?,
            slider.min,
            slider.max
        ));
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn glanza_inputs() -> LoanInputs {
        LoanInputs {
            vehicle_price: dec!(1000000),
            down_payment: dec!(200000),
            annual_rate_percent: dec!(8.5),
            tenure_years: 5,
            rounding: RoundingPolicy::RoundThenMultiply,
        }
    }

    #[test]
    fn test_standard_amortisation() {
        let result = compute_emi(dec!(800000), dec!(8.5), 5).unwrap();
        assert_eq!(result.tenure_months, 60);
        // 800000 * r * (1+r)^60 / ((1+r)^60 - 1) with r = 8.5/1200 ≈ 16413.23
        assert_eq!(result.monthly_installment, dec!(16413));
        assert!((result.exact_monthly_installment - dec!(16413.23)).abs() < dec!(0.01));
        assert_eq!(result.total_payable, dec!(984780));
        assert_eq!(result.total_interest, dec!(184780));
    }

    #[test]
    fn test_zero_rate_divides_evenly() {
        let result = compute_emi(dec!(500000), Decimal::ZERO, 1).unwrap();
        assert_eq!(result.monthly_installment, dec!(41667));
        assert_eq!(result.exact_monthly_installment, dec!(500000) / dec!(12));
        assert_eq!(result.total_payable, dec!(500000));
        assert_eq!(result.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_carry_precision() {
        let result =
            compute_emi_with(dec!(500000), Decimal::ZERO, 2, RoundingPolicy::CarryPrecision)
                .unwrap();
        // 20833.33 rounds to 20833, which repays only 499992 over 24 months
        assert_eq!(result.monthly_installment, dec!(20834));
        assert_eq!(result.total_payable, dec!(500000));
        assert_eq!(result.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_carry_precision_differs_from_round_then_multiply() {
        let rounded = compute_emi(dec!(800000), dec!(8.5), 5).unwrap();
        let carried =
            compute_emi_with(dec!(800000), dec!(8.5), 5, RoundingPolicy::CarryPrecision).unwrap();
        assert_eq!(rounded.monthly_installment, carried.monthly_installment);
        // 16413.225... * 60 = 984793.50... -> 984794
        assert_eq!(carried.total_payable, dec!(984794));
        assert_eq!(carried.total_interest, dec!(184794));
    }

    #[test]
    fn test_small_loan_at_low_rate_covers_principal() {
        // exact EMI is just over 1.19, which rounds down to 1 and repays only 84
        let result = compute_emi(dec!(100), dec!(0.1), 7).unwrap();
        assert_eq!(result.monthly_installment, dec!(2));
        assert_eq!(result.total_payable, dec!(168));
        assert!(result.total_interest >= Decimal::ZERO);
    }

    #[test]
    fn test_installment_never_rounds_to_zero() {
        let result = compute_emi(dec!(20), dec!(8.5), 7).unwrap();
        assert_eq!(result.monthly_installment, Decimal::ONE);
        assert!(result.monthly_installment * Decimal::from(result.tenure_months) >= dec!(20));
        assert!(result.total_interest >= Decimal::ZERO);

        let carried =
            compute_emi_with(dec!(20), dec!(8.5), 7, RoundingPolicy::CarryPrecision).unwrap();
        assert_eq!(carried.monthly_installment, Decimal::ONE);
        assert!(carried.total_payable >= dec!(20));
    }

    #[test]
    fn test_carry_precision_total_not_below_fractional_principal() {
        let result =
            compute_emi_with(dec!(100.4), Decimal::ZERO, 1, RoundingPolicy::CarryPrecision)
                .unwrap();
        assert!(result.total_payable >= dec!(100.4));
        assert_eq!(result.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_overflowing_principal_is_rejected() {
        let err = compute_emi(Decimal::MAX, dec!(8.5), 5).unwrap_err();
        assert!(matches!(err, AutoFinanceError::InvalidInput { .. }));
        assert!(
            compute_emi_with(Decimal::MAX, dec!(8.5), 5, RoundingPolicy::CarryPrecision).is_err()
        );
    }

    #[test]
    fn test_invalid_principal() {
        assert!(compute_emi(Decimal::ZERO, dec!(8.5), 5).is_err());
        assert!(compute_emi(dec!(-1), dec!(8.5), 5).is_err());
    }

    #[test]
    fn test_invalid_tenure() {
        let err = compute_emi(dec!(800000), dec!(8.5), 0).unwrap_err();
        assert!(matches!(
            err,
            AutoFinanceError::InvalidInput { ref field, .. } if field == "tenure_years"
        ));
    }

    #[test]
    fn test_negative_rate() {
        assert!(compute_emi(dec!(800000), dec!(-0.5), 5).is_err());
    }

    #[test]
    fn test_calculate_loan_derives_principal() {
        let output = calculate_loan(&glanza_inputs()).unwrap();
        assert_eq!(output.result.principal, dec!(800000));
        assert_eq!(output.result.monthly_installment, dec!(16413));
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_calculate_loan_rejects_full_down_payment() {
        let mut input = glanza_inputs();
        input.down_payment = input.vehicle_price;
        assert!(calculate_loan(&input).is_err());
    }

    #[test]
    fn test_calculate_loan_rejects_negative_down_payment() {
        let mut input = glanza_inputs();
        input.down_payment = dec!(-1);
        assert!(calculate_loan(&input).is_err());
    }

    #[test]
    fn test_calculate_loan_warns_outside_showroom_ranges() {
        let mut input = glanza_inputs();
        input.annual_rate_percent = dec!(18);
        input.tenure_years = 10;
        input.down_payment = Decimal::ZERO;
        let output = calculate_loan(&input).unwrap();
        assert_eq!(output.warnings.len(), 3);
    }

    #[test]
    fn test_down_payment_warning_follows_slider_bounds() {
        // round(100000.4) = 100000 is the slider minimum, just under 10%
        let mut input = glanza_inputs();
        input.vehicle_price = dec!(1000004);
        input.down_payment = dec!(100000);
        assert!(calculate_loan(&input).unwrap().warnings.is_empty());

        // 1.5 is exactly 10% of 15, but the slider starts at round(1.5) = 2
        input.vehicle_price = dec!(15);
        input.down_payment = dec!(1.5);
        let warnings = calculate_loan(&input).unwrap().warnings;
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Down payment of 1.5"));
    }
}
