pub mod calculator;

#[cfg(feature = "schedule")]
pub mod schedule;

pub use calculator::{calculate_loan, compute_emi, compute_emi_with, LoanInputs, LoanResult};
