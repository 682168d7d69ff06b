use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use auto_finance_core::format::{format_inr, format_short};

/// Arguments for rupee formatting
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct FormatArgs {
    /// Amount to format
    pub amount: Decimal,
}

pub fn run_format(args: FormatArgs) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(json!({
        "amount": args.amount.to_string(),
        "inr": format_inr(args.amount),
        "short": format_short(args.amount),
    }))
}
