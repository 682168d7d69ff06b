use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use auto_finance_core::catalogue;
use auto_finance_core::emi::schedule::{self, ScheduleInput};
use auto_finance_core::emi::{self, LoanInputs};
use auto_finance_core::format::format_loan;
use auto_finance_core::{round_currency, RoundingPolicy};

use crate::config::CliConfig;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoundingArg {
    /// Round the EMI, then multiply by the tenure (showroom figures)
    RoundThenMultiply,
    /// Carry the unrounded EMI into the totals
    CarryPrecision,
}

impl From<RoundingArg> for RoundingPolicy {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::RoundThenMultiply => RoundingPolicy::RoundThenMultiply,
            RoundingArg::CarryPrecision => RoundingPolicy::CarryPrecision,
        }
    }
}

/// Arguments for a raw EMI on a known principal
#[derive(Args)]
pub struct EmiArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount financed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (8.5 = 8.5%)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Tenure in whole years
    #[arg(long, alias = "years")]
    pub tenure_years: Option<u32>,

    #[arg(long, value_enum)]
    pub rounding: Option<RoundingArg>,
}

#[derive(Debug, Deserialize)]
struct EmiRequest {
    principal: Decimal,
    annual_rate_percent: Decimal,
    tenure_years: u32,
    #[serde(default)]
    rounding: RoundingPolicy,
}

pub fn run_emi(args: EmiArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let request: EmiRequest = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        let principal = args
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        EmiRequest {
            principal,
            annual_rate_percent: args
                .annual_rate_percent
                .unwrap_or_else(|| config.annual_rate_percent()),
            tenure_years: args.tenure_years.unwrap_or_else(|| config.tenure_years()),
            rounding: args
                .rounding
                .map(RoundingPolicy::from)
                .unwrap_or_else(|| config.rounding()),
        }
    };

    let result = emi::compute_emi_with(
        request.principal,
        request.annual_rate_percent,
        request.tenure_years,
        request.rounding,
    )?;
    Ok(serde_json::to_value(result)?)
}

/// Vehicle and slider values shared by the loan, schedule and quote commands
#[derive(Args)]
pub struct VehicleArgs {
    /// Showroom model to price (see `autofin models`)
    #[arg(long, conflicts_with = "price")]
    pub model: Option<String>,

    /// Ex-showroom vehicle price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment amount
    #[arg(long, conflicts_with = "down_payment_percent")]
    pub down_payment: Option<Decimal>,

    /// Down payment as a percentage of the price (20 = 20%)
    #[arg(long)]
    pub down_payment_percent: Option<Decimal>,

    /// Annual interest rate in percent (8.5 = 8.5%)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Tenure in whole years
    #[arg(long, alias = "years")]
    pub tenure_years: Option<u32>,

    #[arg(long, value_enum)]
    pub rounding: Option<RoundingArg>,
}

impl VehicleArgs {
    pub fn vehicle_price(&self) -> Result<Decimal, Box<dyn std::error::Error>> {
        if let Some(ref query) = self.model {
            let model = catalogue::find_model(query).ok_or_else(|| {
                format!("Unknown model '{}'; run `autofin models` to list them", query)
            })?;
            info!(model = %model.display_name(), price = %model.price, "priced from showroom");
            return Ok(model.price);
        }
        Ok(self
            .price
            .ok_or("--price or --model is required (or provide --input)")?)
    }

    /// True when any slider value was given on the command line
    pub fn has_overrides(&self) -> bool {
        self.down_payment.is_some()
            || self.down_payment_percent.is_some()
            || self.annual_rate_percent.is_some()
            || self.tenure_years.is_some()
            || self.rounding.is_some()
    }

    /// Flags first, then config, then showroom presets.
    pub fn resolve(&self, config: &CliConfig) -> Result<LoanInputs, Box<dyn std::error::Error>> {
        let vehicle_price = self.vehicle_price()?;
        let down_payment = match (self.down_payment, self.down_payment_percent) {
            (Some(amount), _) => amount,
            (None, Some(pct)) => round_currency(vehicle_price * pct / dec!(100)),
            (None, None) => round_currency(vehicle_price * config.down_payment_fraction()),
        };

        Ok(LoanInputs {
            vehicle_price,
            down_payment,
            annual_rate_percent: self
                .annual_rate_percent
                .unwrap_or_else(|| config.annual_rate_percent()),
            tenure_years: self.tenure_years.unwrap_or_else(|| config.tenure_years()),
            rounding: self
                .rounding
                .map(RoundingPolicy::from)
                .unwrap_or_else(|| config.rounding()),
        })
    }
}

/// Arguments for a vehicle loan calculation
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub vehicle: VehicleArgs,

    /// Add rupee-formatted display strings to the output
    #[arg(long)]
    pub formatted: bool,
}

pub fn run_loan(args: LoanArgs, config: &CliConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInputs = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        args.vehicle.resolve(config)?
    };

    let output = emi::calculate_loan(&loan_input)?;
    let formatted = format_loan(&output.result);
    let mut value = serde_json::to_value(output)?;
    if args.formatted {
        value["formatted"] = serde_json::to_value(formatted)?;
    }
    Ok(value)
}

/// Arguments for a month-by-month repayment schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub vehicle: VehicleArgs,

    /// Due date of the first installment (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,
}

pub fn run_schedule(
    args: ScheduleArgs,
    config: &CliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        ScheduleInput {
            loan: args.vehicle.resolve(config)?,
            first_payment_date: args.first_payment_date,
        }
    };

    let result = schedule::build_amortization_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}
