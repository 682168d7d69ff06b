use clap::Args;
use serde_json::Value;

use auto_finance_core::emi::LoanInputs;
use auto_finance_core::format::{format_inr, format_loan};
use auto_finance_core::presets;

use crate::commands::loan::VehicleArgs;
use crate::config::CliConfig;
use crate::input;

/// Arguments for a showroom quote
#[derive(Args)]
pub struct QuoteArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub vehicle: VehicleArgs,
}

/// Opening-default quote for a price or model, or a slider-bounded quote when
/// any slider value is supplied by flags, config or input file.
pub fn run_quote(args: QuoteArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let requested: Option<LoanInputs> = if let Some(ref path) = args.input {
        Some(input::file::read_input(path)?)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Some(data)
    } else if args.vehicle.has_overrides() || config.has_loan_defaults() {
        Some(args.vehicle.resolve(config)?)
    } else {
        None
    };

    let output = match requested {
        Some(ref inputs) => presets::showroom_quote(inputs)?,
        None => presets::default_quote(args.vehicle.vehicle_price()?)?,
    };

    let price_display = format_inr(output.result.inputs.vehicle_price);
    let formatted = format_loan(&output.result.loan);
    let mut value = serde_json::to_value(output)?;
    value["formatted"] = serde_json::to_value(formatted)?;
    value["formatted"]["vehicle_price"] = Value::String(price_display);
    Ok(value)
}
