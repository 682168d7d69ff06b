//! Indian-rupee display strings for calculator output.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::emi::LoanResult;
use crate::types::{round_currency, Money};

const RUPEE: &str = "₹";
const CRORE: Decimal = dec!(10000000);
const LAKH: Decimal = dec!(100000);
const THOUSAND: Decimal = dec!(1000);

/// Whole rupees with Indian digit grouping, e.g. `₹12,34,567`.
pub fn format_inr(amount: Money) -> String {
    let rounded = round_currency(amount);
    let digits = rounded.abs().trunc().to_string();
    let grouped = group_indian(&digits);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{RUPEE}{grouped}")
    } else {
        format!("{RUPEE}{grouped}")
    }
}

/// Compact form: `₹1.23Cr`, `₹8.00L`, `₹16K`, or the plain amount below 1,000.
pub fn format_short(amount: Money) -> String {
    if amount >= CRORE {
        format!("{RUPEE}{:.2}Cr", round_to(amount / CRORE, 2))
    } else if amount >= LAKH {
        format!("{RUPEE}{:.2}L", round_to(amount / LAKH, 2))
    } else if amount >= THOUSAND {
        format!("{RUPEE}{}K", round_to(amount / THOUSAND, 0))
    } else {
        format!("{RUPEE}{}", amount.normalize())
    }
}

/// Display strings for a computed loan, as laid out on the calculator panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedLoan {
    pub monthly_installment: String,
    pub principal: String,
    pub total_interest: String,
    pub total_payable: String,
}

pub fn format_loan(loan: &LoanResult) -> FormattedLoan {
    FormattedLoan {
        monthly_installment: format_inr(loan.monthly_installment),
        principal: format_short(loan.principal),
        total_interest: format_short(loan.total_interest),
        total_payable: format_short(loan.total_payable),
    }
}

fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Last three digits, then pairs: 1234567 -> 12,34,567
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
