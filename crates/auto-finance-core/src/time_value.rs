use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::AutoFinanceError;
use crate::types::{Money, Percent, Rate};
use crate::AutoFinanceResult;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Periodic monthly rate from an annual percentage quote (8.5 -> 0.0070833..)
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / Decimal::from(MONTHS_PER_YEAR) / dec!(100)
}

/// Compound growth factor (1 + r)^n
pub fn compound_factor(rate: Rate, nper: u32) -> AutoFinanceResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| AutoFinanceError::InvalidInput {
            field: "rate".into(),
            reason: format!("Compounding {rate} over {nper} periods overflows"),
        })
}

/// Level payment that fully amortises `principal` over `nper` periods.
///
/// Returned as a positive amount (the borrower's outflow), unlike the
/// spreadsheet PMT sign convention.
pub fn level_payment(rate: Rate, nper: u32, principal: Money) -> AutoFinanceResult<Money> {
    if nper == 0 {
        return Err(AutoFinanceError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = compound_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        return Err(AutoFinanceError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .map(|numerator| numerator / denominator)
        .ok_or_else(|| AutoFinanceError::InvalidInput {
            field: "principal".into(),
            reason: "Payment calculation overflows".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_rate_from_percent() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_compound_factor() {
        assert_eq!(compound_factor(dec!(0.10), 2).unwrap(), dec!(1.21));
        assert_eq!(compound_factor(dec!(0.05), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_level_payment_basic() {
        // 1000 at 1% per period over 12 periods ≈ 88.85
        let result = level_payment(dec!(0.01), 12, dec!(1000)).unwrap();
        assert!((result - dec!(88.85)).abs() < dec!(0.01));
    }

    #[test]
    fn test_level_payment_zero_rate() {
        let result = level_payment(Decimal::ZERO, 4, dec!(1000)).unwrap();
        assert_eq!(result, dec!(250));
    }

    #[test]
    fn test_level_payment_zero_periods() {
        assert!(level_payment(dec!(0.01), 0, dec!(1000)).is_err());
    }

    #[test]
    fn test_level_payment_overflow_is_error() {
        assert!(level_payment(dec!(1000000), 84, dec!(1000000)).is_err());
    }
}
