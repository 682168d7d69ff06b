use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::emi::calculator::{
    compute_emi_with, showroom_range_warnings, validate_vehicle_inputs, LoanInputs,
};
use crate::error::AutoFinanceError;
use crate::types::*;
use crate::AutoFinanceResult;

/// Input for a month-by-month repayment schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    #[serde(flatten)]
    pub loan: LoanInputs,
    /// Due date of the first installment; later dates follow monthly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

/// A single month in the repayment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePeriod {
    pub month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub opening_balance: Money,
    pub installment: Money,
    pub interest: Money,
    pub principal_repaid: Money,
    pub closing_balance: Money,
}

/// Output for a full repayment schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub monthly_installment: Money,
    pub periods: Vec<SchedulePeriod>,
    pub total_interest: Money,
    pub total_paid: Money,
}

/// Build the month-by-month repayment schedule for a vehicle loan.
///
/// Every month pays the rounded EMI; interest accrues on the opening balance
/// and the final installment absorbs whatever residual rounding leaves.
pub fn build_amortization_schedule(
    input: &ScheduleInput,
) -> AutoFinanceResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let loan = &input.loan;

    validate_vehicle_inputs(loan)?;
    let emi = compute_emi_with(
        loan.principal(),
        loan.annual_rate_percent,
        loan.tenure_years,
        loan.rounding,
    )?;
    let mut warnings = showroom_range_warnings(loan)?;

    let rate = emi.monthly_rate;
    let mut periods = Vec::with_capacity(emi.tenure_months as usize);
    let mut balance = emi.principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for month in 1..=emi.tenure_months {
        let opening = balance;
        let interest = opening.checked_mul(rate).ok_or_else(|| overflow(month))?;

        let installment = if month == emi.tenure_months {
            opening.checked_add(interest).ok_or_else(|| overflow(month))?
        } else {
            emi.monthly_installment
        };
        let principal_repaid = installment - interest;

        if principal_repaid < Decimal::ZERO {
            warnings.push(format!(
                "Month {month}: installment {installment} does not cover interest {}",
                interest.round_dp(2)
            ));
        }

        balance = opening
            .checked_sub(principal_repaid)
            .ok_or_else(|| overflow(month))?;
        total_interest = total_interest
            .checked_add(interest)
            .ok_or_else(|| overflow(month))?;
        total_paid = total_paid
            .checked_add(installment)
            .ok_or_else(|| overflow(month))?;

        let due_date = match input.first_payment_date {
            Some(first) => Some(due_date(first, month)?),
            None => None,
        };

        periods.push(SchedulePeriod {
            month,
            due_date,
            opening_balance: opening.round_dp(2),
            installment: installment.round_dp(2),
            interest: interest.round_dp(2),
            principal_repaid: principal_repaid.round_dp(2),
            closing_balance: balance.round_dp(2),
        });
    }

    debug!(
        months = periods.len(),
        %total_interest,
        "built amortization schedule"
    );

    let output = AmortizationSchedule {
        principal: emi.principal,
        monthly_installment: emi.monthly_installment,
        periods,
        total_interest: total_interest.round_dp(2),
        total_paid: total_paid.round_dp(2),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance repayment schedule",
        &serde_json::json!({
            "principal": emi.principal.to_string(),
            "monthly_rate": rate.to_string(),
            "tenure_months": emi.tenure_months,
            "first_payment_date": input.first_payment_date,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn overflow(month: u32) -> AutoFinanceError {
    AutoFinanceError::invalid(
        "principal",
        format!("Month {month} balance is too large to compute"),
    )
}

fn due_date(first: NaiveDate, month: u32) -> AutoFinanceResult<NaiveDate> {
    first
        .checked_add_months(Months::new(month - 1))
        .ok_or_else(|| AutoFinanceError::InvalidInput {
            field: "first_payment_date".into(),
            reason: format!("Installment {month} falls outside the supported date range"),
        })
}
