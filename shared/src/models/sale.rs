//! Sales of milled rice and by-products

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProductKind;

/// Settlement state of a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Lunas
    #[default]
    #[serde(alias = "lunas")]
    Paid,
    /// Belum lunas
    #[serde(alias = "belum_lunas")]
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "paid" | "lunas" => Some(PaymentStatus::Paid),
            "unpaid" | "belum_lunas" | "belum lunas" => Some(PaymentStatus::Unpaid),
            _ => None,
        }
    }
}

/// Input for recording a sale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSale {
    pub date: NaiveDate,
    pub buyer: String,
    #[serde(default)]
    pub product_kind: ProductKind,
    pub quantity_kg: Decimal,
    pub unit_price: Decimal,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub settled_date: Option<NaiveDate>,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewSale {
    /// Saturates at `Decimal::MAX`; validation keeps real totals far below it
    pub fn total_price(&self) -> Decimal {
        self.quantity_kg.saturating_mul(self.unit_price)
    }

    pub fn stock_item(&self) -> &'static str {
        self.product_kind.stock_item(None)
    }
}

/// A recorded sale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sale {
    pub id: Uuid,
    pub date: NaiveDate,
    pub buyer: String,
    pub product_kind: ProductKind,
    pub quantity_kg: Decimal,
    pub unit_price: Decimal,
    /// quantity_kg * unit_price
    pub total_price: Decimal,
    pub payment_status: PaymentStatus,
    pub due_date: Option<NaiveDate>,
    pub settled_date: Option<NaiveDate>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    pub fn from_new(id: Uuid, input: NewSale, created_at: DateTime<Utc>) -> Self {
        let total_price = input.total_price();
        Self {
            id,
            date: input.date,
            buyer: input.buyer,
            product_kind: input.product_kind,
            quantity_kg: input.quantity_kg,
            unit_price: input.unit_price,
            total_price,
            payment_status: input.payment_status,
            due_date: input.due_date,
            settled_date: input.settled_date,
            note: input.note,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sale_defaults() {
        let json = r#"{"date":"2025-07-16","buyer":"Toko Sari","quantity_kg":"300","unit_price":"15000"}"#;
        let input: NewSale = serde_json::from_str(json).unwrap();

        assert_eq!(input.product_kind, ProductKind::Beras);
        assert_eq!(input.payment_status, PaymentStatus::Paid);
        assert_eq!(input.total_price(), dec!(4500000));
    }

    #[test]
    fn test_payment_status_accepts_indonesian() {
        let status: PaymentStatus = serde_json::from_str("\"belum_lunas\"").unwrap();
        assert_eq!(status, PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::parse("Lunas"), Some(PaymentStatus::Paid));
    }
}
