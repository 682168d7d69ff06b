//! Featured models on the showroom floor and their ex-showroom prices.

use rust_decimal_macros::dec;
use serde::Serialize;

use crate::types::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    #[serde(rename = "CNG")]
    Cng,
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleModel {
    pub name: &'static str,
    pub variant: &'static str,
    pub category: &'static str,
    pub fuel_type: FuelType,
    pub transmission: &'static str,
    pub price: Money,
    pub original_price: Money,
    pub savings: Money,
}

impl VehicleModel {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.variant)
    }
}

fn model(
    name: &'static str,
    variant: &'static str,
    category: &'static str,
    fuel_type: FuelType,
    transmission: &'static str,
    price: Money,
    original_price: Money,
) -> VehicleModel {
    VehicleModel {
        name,
        variant,
        category,
        fuel_type,
        transmission,
        price,
        original_price,
        savings: original_price - price,
    }
}

/// All featured models, in showroom order
pub fn showroom_models() -> Vec<VehicleModel> {
    vec![
        model("Glanza", "S+ CVT", "Hatchback", FuelType::Petrol, "CVT", dec!(1000000), dec!(1099000)),
        model("Taisor", "S+ CNG", "Compact SUV", FuelType::Cng, "Manual", dec!(1411000), dec!(1522000)),
        model("Rumion", "S+ MT", "MPV", FuelType::Petrol, "Manual", dec!(1044000), dec!(1092000)),
        model("Innova Hycross", "ZX(O) Hybrid", "Premium MPV", FuelType::Hybrid, "CVT", dec!(3134000), dec!(3202000)),
        model("Innova Crysta", "ZX", "MPV", FuelType::Diesel, "Automatic", dec!(2708000), dec!(2889000)),
        model("Land Cruiser", "300 VX", "Premium SUV", FuelType::Petrol, "Automatic", dec!(23100000), dec!(24100000)),
    ]
}

/// Look a model up by name, or by name and variant, ignoring case.
pub fn find_model(query: &str) -> Option<VehicleModel> {
    let query = query.trim().to_lowercase();
    showroom_models().into_iter().find(|m| {
        m.name.to_lowercase() == query || m.display_name().to_lowercase() == query
    })
}
