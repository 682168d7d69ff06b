use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse a decimal passed from JS as a string ("800000", "8.5").
fn parse_decimal(field: &str, value: &str) -> NapiResult<rust_decimal::Decimal> {
    value
        .trim()
        .parse()
        .map_err(|e| to_napi_error(format!("{field}: {e}")))
}

// ---------------------------------------------------------------------------
// EMI
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct EmiBindingInput {
    principal: rust_decimal::Decimal,
    annual_rate_percent: rust_decimal::Decimal,
    tenure_years: u32,
    #[serde(default)]
    rounding: auto_finance_core::RoundingPolicy,
}

#[napi]
pub fn compute_emi(input_json: String) -> NapiResult<String> {
    let input: EmiBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = auto_finance_core::emi::compute_emi_with(
        input.principal,
        input.annual_rate_percent,
        input.tenure_years,
        input.rounding,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    let input: auto_finance_core::emi::LoanInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = auto_finance_core::emi::calculate_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: auto_finance_core::emi::schedule::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = auto_finance_core::emi::schedule::build_amortization_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Showroom presets
// ---------------------------------------------------------------------------

#[napi]
pub fn default_quote(vehicle_price: String) -> NapiResult<String> {
    let price = parse_decimal("vehicle_price", &vehicle_price)?;
    let output = auto_finance_core::presets::default_quote(price).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn showroom_quote(input_json: String) -> NapiResult<String> {
    let input: auto_finance_core::emi::LoanInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = auto_finance_core::presets::showroom_quote(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn showroom_models() -> NapiResult<String> {
    serde_json::to_string(&auto_finance_core::catalogue::showroom_models()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_inr(amount: String) -> NapiResult<String> {
    let amount = parse_decimal("amount", &amount)?;
    Ok(auto_finance_core::format::format_inr(amount))
}

#[napi]
pub fn format_short(amount: String) -> NapiResult<String> {
    let amount = parse_decimal("amount", &amount)?;
    Ok(auto_finance_core::format::format_short(amount))
}
