//! WebAssembly module for PadiDoc
//!
//! Provides client-side computation for:
//! - Purchase and sale totals
//! - Drying weight loss and milling rendemen
//! - Cash flow status and rupiah formatting
//! - Offline validation and stock movement previews

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;
use shared::{CashFlowStatus, GeneratesMovements};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("PadiDoc calculators ready"));
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn parse_json<T: DeserializeOwned>(kind: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", kind, e))
}

/// Total price of a purchase or sale line
#[wasm_bindgen]
pub fn calculate_total_price(quantity_kg: f64, unit_price: f64) -> f64 {
    to_f64(to_decimal(quantity_kg).saturating_mul(to_decimal(unit_price)))
}

/// Weight lost during drying; 0 unless both weights are known
#[wasm_bindgen]
pub fn calculate_weight_loss(initial_weight_kg: f64, dried_weight_kg: f64) -> f64 {
    let known = |v: f64| (v.is_finite() && v > 0.0).then(|| to_decimal(v));
    to_f64(weight_loss(known(initial_weight_kg), known(dried_weight_kg)))
}

/// Rice yield as a percentage of milled input, two decimals
#[wasm_bindgen]
pub fn calculate_rendemen(rice_kg: f64, input_weight_kg: f64) -> f64 {
    to_f64(rendemen(to_decimal(rice_kg), to_decimal(input_weight_kg)))
}

/// `profit`, `loss` or `break_even` for a net flow
#[wasm_bindgen]
pub fn classify_cash_flow(net_flow: f64) -> String {
    CashFlowStatus::from_net(to_decimal(net_flow)).as_str().to_string()
}

#[wasm_bindgen]
pub fn format_rupiah(amount: f64) -> String {
    shared::format_rupiah(to_decimal(amount))
}

fn validate_json(kind: &str, json: &str) -> Result<(), String> {
    let result = match kind {
        "purchase" => validate_purchase(&parse_json(kind, json)?),
        "production" => validate_production(&parse_json(kind, json)?),
        "sale" => validate_sale(&parse_json(kind, json)?),
        "drying" => validate_drying(&parse_json(kind, json)?),
        "expense" => validate_expense(&parse_json(kind, json)?),
        other => return Err(format!("Unknown record kind: {}", other)),
    };
    result.map_err(|e| format!("{} {}", e.field, e.message_idn))
}

fn preview_json(kind: &str, json: &str) -> Result<String, String> {
    let plan = match kind {
        "purchase" => parse_json::<NewPurchase>(kind, json)?.movement_plan(),
        "production" => parse_json::<NewProduction>(kind, json)?.movement_plan(),
        "sale" => parse_json::<NewSale>(kind, json)?.movement_plan(),
        "drying" => parse_json::<NewDrying>(kind, json)?.movement_plan(),
        other => return Err(format!("Unknown record kind: {}", other)),
    };
    serde_json::to_string(&plan).map_err(|e| e.to_string())
}

/// Validate a record form before it is queued for upload
#[wasm_bindgen]
pub fn validate_record_json(kind: &str, json: &str) -> Result<(), JsValue> {
    validate_json(kind, json).map_err(|e| JsValue::from_str(&e))
}

/// Stock movements a record would make, as JSON
#[wasm_bindgen]
pub fn preview_movements(kind: &str, json: &str) -> Result<String, JsValue> {
    preview_json(kind, json).map_err(|e| JsValue::from_str(&e))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_invalid_record_rejected_as_js_error() {
        let negative = r#"{"date":"2025-07-16","buyer":"Toko Sari","quantity_kg":"-1","unit_price":"15000"}"#;
        let err = validate_record_json("sale", negative).unwrap_err();
        assert!(err.as_string().unwrap().contains("quantity_kg"));
    }
}
