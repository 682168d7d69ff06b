use clap::Args;
use serde_json::{json, Value};

use auto_finance_core::catalogue;
use auto_finance_core::format::format_inr;
use auto_finance_core::presets;

/// Arguments for listing showroom models
#[derive(Args)]
pub struct ModelsArgs {
    /// Only list models whose category contains this text
    #[arg(long)]
    pub category: Option<String>,
}

/// Featured models with the EMI the calculator opens with for each.
pub fn run_models(args: ModelsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let filter = args.category.map(|c| c.to_lowercase());
    let mut rows = Vec::new();

    for model in catalogue::showroom_models() {
        if let Some(ref f) = filter {
            if !model.category.to_lowercase().contains(f.as_str()) {
                continue;
            }
        }

        let quote = presets::default_quote(model.price)?;
        rows.push(json!({
            "model": model.display_name(),
            "category": model.category,
            "fuel_type": model.fuel_type,
            "transmission": model.transmission,
            "price": format_inr(model.price),
            "savings": format_inr(model.savings),
            "default_emi": format_inr(quote.result.loan.monthly_installment),
            "tenure_years": quote.result.inputs.tenure_years,
        }));
    }

    Ok(Value::Array(rows))
}
