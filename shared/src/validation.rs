//! Input validation for business records
//!
//! Every check runs before any persistence. Failures carry the offending
//! field so the API can point the user at it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use crate::models::{
    NewBusinessRecord, NewDrying, NewExpense, NewProduction, NewPurchase, NewSale,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    /// Same message in Bahasa Indonesia
    pub message_idn: String,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        message_idn: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            message_idn: message_idn.into(),
        }
    }
}

pub type ValidationResult = Result<(), ValidationError>;

// ============================================================================
// Storage Bounds
// ============================================================================

/// Decimal places kept for weights
pub const QUANTITY_SCALE: u32 = 3;

/// Largest weight a record or stock item can hold, in kg
pub const MAX_QUANTITY_KG: Decimal = dec!(99999999999.999);

/// Decimal places kept for prices, costs and amounts
pub const MONEY_SCALE: u32 = 2;

/// Largest price, cost, amount or total a record can hold, in rupiah
pub const MAX_MONEY: Decimal = dec!(999999999999.99);

// ============================================================================
// Field Validations
// ============================================================================

/// Quantities, prices and amounts may be zero but never negative
pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult {
    if value < Decimal::ZERO {
        return Err(ValidationError::new(field, "must not be negative", "tidak boleh negatif"));
    }
    Ok(())
}

fn validate_bounded(field: &str, value: Decimal, max: Decimal, scale: u32) -> ValidationResult {
    validate_non_negative(field, value)?;
    if value.normalize().scale() > scale {
        return Err(ValidationError::new(
            field,
            format!("must have at most {} decimal places", scale),
            format!("maksimal {} angka di belakang koma", scale),
        ));
    }
    if value > max {
        return Err(ValidationError::new(
            field,
            format!("must not exceed {}", max),
            format!("tidak boleh melebihi {}", max),
        ));
    }
    Ok(())
}

/// A weight in kg: non-negative, gram precision, within [`MAX_QUANTITY_KG`]
pub fn validate_quantity(field: &str, value: Decimal) -> ValidationResult {
    validate_bounded(field, value, MAX_QUANTITY_KG, QUANTITY_SCALE)
}

pub fn validate_optional_quantity(field: &str, value: Option<Decimal>) -> ValidationResult {
    match value {
        Some(v) => validate_quantity(field, v),
        None => Ok(()),
    }
}

/// A rupiah value: non-negative, whole sen, within [`MAX_MONEY`]
pub fn validate_money(field: &str, value: Decimal) -> ValidationResult {
    validate_bounded(field, value, MAX_MONEY, MONEY_SCALE)
}

/// Quantity times unit price must itself be storable
fn validate_total(quantity: Decimal, unit_price: Decimal) -> ValidationResult {
    match quantity.checked_mul(unit_price) {
        Some(total) if total <= MAX_MONEY => Ok(()),
        _ => Err(ValidationError::new(
            "unit_price",
            format!("total price must not exceed {}", MAX_MONEY),
            format!("total harga tidak boleh melebihi {}", MAX_MONEY),
        )),
    }
}

pub fn validate_not_blank(field: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be blank", "wajib diisi"));
    }
    Ok(())
}

// ============================================================================
// Record Validations
// ============================================================================

pub fn validate_purchase(input: &NewPurchase) -> ValidationResult {
    validate_not_blank("supplier", &input.supplier)?;
    validate_quantity("weight_kg", input.weight_kg)?;
    validate_money("unit_price", input.unit_price)?;
    validate_total(input.weight_kg, input.unit_price)?;
    Ok(())
}

pub fn validate_production(input: &NewProduction) -> ValidationResult {
    validate_quantity("input_weight_kg", input.input_weight_kg)?;
    validate_optional_quantity("rice_kg", input.rice_kg)?;
    validate_optional_quantity("bran_kg", input.bran_kg)?;
    validate_optional_quantity("broken_kg", input.broken_kg)?;
    validate_optional_quantity("fines_kg", input.fines_kg)?;
    validate_optional_quantity("husk_kg", input.husk_kg)?;

    if input.total_output_kg() > input.input_weight_kg {
        return Err(ValidationError::new(
            "input_weight_kg",
            "outputs must not exceed the input weight",
            "total hasil tidak boleh melebihi bahan yang digiling",
        ));
    }
    Ok(())
}

pub fn validate_sale(input: &NewSale) -> ValidationResult {
    validate_not_blank("buyer", &input.buyer)?;
    validate_quantity("quantity_kg", input.quantity_kg)?;
    validate_money("unit_price", input.unit_price)?;
    validate_total(input.quantity_kg, input.unit_price)?;

    if let Some(due) = input.due_date {
        if due < input.date {
            return Err(ValidationError::new(
                "due_date",
                "must not precede the sale date",
                "tidak boleh sebelum tanggal penjualan",
            ));
        }
    }
    if let Some(settled) = input.settled_date {
        if settled < input.date {
            return Err(ValidationError::new(
                "settled_date",
                "must not precede the sale date",
                "tidak boleh sebelum tanggal penjualan",
            ));
        }
    }
    Ok(())
}

pub fn validate_drying(input: &NewDrying) -> ValidationResult {
    validate_optional_quantity("initial_weight_kg", input.initial_weight_kg)?;
    validate_optional_quantity("dried_weight_kg", input.dried_weight_kg)?;
    validate_money("cost", input.cost)?;

    if let (Some(initial), Some(dried)) = (input.initial_weight_kg, input.dried_weight_kg) {
        if dried > initial {
            return Err(ValidationError::new(
                "dried_weight_kg",
                "must not exceed the initial weight",
                "berat kering tidak boleh melebihi berat awal",
            ));
        }
    }
    Ok(())
}

pub fn validate_expense(input: &NewExpense) -> ValidationResult {
    validate_not_blank("category", &input.category)?;
    validate_money("amount", input.amount)?;
    Ok(())
}

pub fn validate_record(input: &NewBusinessRecord) -> ValidationResult {
    match input {
        NewBusinessRecord::Purchase(p) => validate_purchase(p),
        NewBusinessRecord::Production(p) => validate_production(p),
        NewBusinessRecord::Sale(s) => validate_sale(s),
        NewBusinessRecord::Drying(d) => validate_drying(d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DryingMethod, GrainSource, PaymentStatus, ProductKind};
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn sale() -> NewSale {
        NewSale {
            date: d(16),
            buyer: "Toko Sari".to_string(),
            product_kind: ProductKind::Beras,
            quantity_kg: dec!(300),
            unit_price: dec!(15000),
            payment_status: PaymentStatus::Unpaid,
            due_date: Some(d(30)),
            settled_date: None,
            note: None,
        }
    }

    #[test]
    fn test_non_negative() {
        assert!(validate_non_negative("weight_kg", Decimal::ZERO).is_ok());
        let err = validate_non_negative("weight_kg", dec!(-1)).unwrap_err();
        assert_eq!(err.field, "weight_kg");
    }

    #[test]
    fn test_blank_supplier_rejected() {
        let input = NewPurchase {
            date: d(16),
            supplier: "   ".to_string(),
            product_kind: ProductKind::Gabah,
            status: None,
            weight_kg: dec!(10),
            unit_price: dec!(8000),
            note: None,
        };
        assert_eq!(validate_purchase(&input).unwrap_err().field, "supplier");
    }

    #[test]
    fn test_sale_dates() {
        assert!(validate_sale(&sale()).is_ok());

        let mut early_due = sale();
        early_due.due_date = Some(d(15));
        assert_eq!(validate_sale(&early_due).unwrap_err().field, "due_date");

        let mut early_settled = sale();
        early_settled.settled_date = Some(d(1));
        assert_eq!(validate_sale(&early_settled).unwrap_err().field, "settled_date");
    }

    #[test]
    fn test_production_outputs_bounded_by_input() {
        let mut input = NewProduction {
            date: d(16),
            rice_type: None,
            source: GrainSource::Gabah,
            input_weight_kg: dec!(800),
            rice_kg: Some(dec!(480)),
            bran_kg: Some(dec!(80)),
            broken_kg: None,
            fines_kg: None,
            husk_kg: Some(dec!(160)),
            note: None,
        };
        assert!(validate_production(&input).is_ok());

        input.husk_kg = Some(dec!(300));
        assert!(validate_production(&input).is_err());

        input.husk_kg = Some(dec!(-1));
        assert_eq!(validate_production(&input).unwrap_err().field, "husk_kg");
    }

    #[test]
    fn test_drying_cannot_gain_weight() {
        let input = NewDrying {
            date: d(16),
            initial_weight_kg: Some(dec!(100)),
            dried_weight_kg: Some(dec!(120)),
            method: DryingMethod::OwnEquipment,
            cost: Decimal::ZERO,
            note: None,
        };
        assert_eq!(validate_drying(&input).unwrap_err().field, "dried_weight_kg");
    }

    #[test]
    fn test_expense() {
        let input = NewExpense {
            date: d(16),
            category: String::new(),
            amount: dec!(10000),
            note: None,
        };
        assert_eq!(validate_expense(&input).unwrap_err().field, "category");
    }

    #[test]
    fn test_quantity_precision_and_bounds() {
        assert!(validate_quantity("quantity_kg", dec!(0.001)).is_ok());
        assert!(validate_quantity("quantity_kg", dec!(10.5000)).is_ok());
        assert!(validate_quantity("quantity_kg", MAX_QUANTITY_KG).is_ok());

        let err = validate_quantity("quantity_kg", dec!(0.0004)).unwrap_err();
        assert_eq!(err.field, "quantity_kg");
        assert!(err.message.contains("decimal places"));

        let err = validate_quantity("weight_kg", dec!(100000000000)).unwrap_err();
        assert!(err.message.contains("exceed"));
    }

    #[test]
    fn test_sale_rejects_sub_gram_quantity() {
        let mut input = sale();
        input.quantity_kg = dec!(0.0004);
        assert_eq!(validate_sale(&input).unwrap_err().field, "quantity_kg");
    }

    #[test]
    fn test_price_keeps_two_decimals() {
        let mut input = sale();
        input.unit_price = dec!(15000.125);
        assert_eq!(validate_sale(&input).unwrap_err().field, "unit_price");

        input.unit_price = dec!(15000.50);
        assert!(validate_sale(&input).is_ok());
    }

    #[test]
    fn test_purchase_total_must_fit() {
        let input = NewPurchase {
            date: d(16),
            supplier: "Pak Budi".to_string(),
            product_kind: ProductKind::Gabah,
            status: None,
            weight_kg: dec!(90000000000),
            unit_price: dec!(900000000000),
            note: None,
        };
        let err = validate_purchase(&input).unwrap_err();
        assert_eq!(err.field, "unit_price");
        assert!(err.message.starts_with("total price"));
    }

    #[test]
    fn test_overflowing_purchase_rejected() {
        let input = NewPurchase {
            date: d(16),
            supplier: "Pak Budi".to_string(),
            product_kind: ProductKind::Gabah,
            status: None,
            weight_kg: dec!(100000000000000000000),
            unit_price: dec!(100000000000),
            note: None,
        };
        assert_eq!(validate_purchase(&input).unwrap_err().field, "weight_kg");
    }

    #[test]
    fn test_expense_and_drying_cost_bounded() {
        let input = NewExpense {
            date: d(16),
            category: "Solar".to_string(),
            amount: dec!(1000000000000),
            note: None,
        };
        assert_eq!(validate_expense(&input).unwrap_err().field, "amount");

        let drying = NewDrying {
            date: d(16),
            initial_weight_kg: Some(dec!(100)),
            dried_weight_kg: Some(dec!(86)),
            method: DryingMethod::OwnEquipment,
            cost: dec!(0.005),
            note: None,
        };
        assert_eq!(validate_drying(&drying).unwrap_err().field, "cost");
    }
}
