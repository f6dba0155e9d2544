//! Purchase of raw grain or milled products

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GrainStatus, ProductKind};

fn default_purchase_kind() -> ProductKind {
    ProductKind::Gabah
}

/// Input for recording a purchase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPurchase {
    pub date: NaiveDate,
    pub supplier: String,
    #[serde(default = "default_purchase_kind")]
    pub product_kind: ProductKind,
    /// Moisture state, only meaningful for grain
    #[serde(default)]
    pub status: Option<GrainStatus>,
    pub weight_kg: Decimal,
    pub unit_price: Decimal,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewPurchase {
    /// Saturates at `Decimal::MAX`; validation keeps real totals far below it
    pub fn total_price(&self) -> Decimal {
        self.weight_kg.saturating_mul(self.unit_price)
    }

    pub fn stock_item(&self) -> &'static str {
        self.product_kind.stock_item(self.status)
    }
}

/// A recorded purchase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Purchase {
    pub id: Uuid,
    pub date: NaiveDate,
    pub supplier: String,
    pub product_kind: ProductKind,
    pub status: Option<GrainStatus>,
    pub weight_kg: Decimal,
    pub unit_price: Decimal,
    /// weight_kg * unit_price
    pub total_price: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    pub fn from_new(id: Uuid, input: NewPurchase, created_at: DateTime<Utc>) -> Self {
        let total_price = input.total_price();
        Self {
            id,
            date: input.date,
            supplier: input.supplier,
            product_kind: input.product_kind,
            status: input.status,
            weight_kg: input.weight_kg,
            unit_price: input.unit_price,
            total_price,
            note: input.note,
            created_at,
        }
    }
}
