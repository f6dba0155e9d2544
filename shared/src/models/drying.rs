//! Drying of wet grain

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Equipment used for a drying run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DryingMethod {
    #[default]
    #[serde(alias = "alat_sendiri")]
    OwnEquipment,
    #[serde(alias = "sewa")]
    Rented,
}

impl DryingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DryingMethod::OwnEquipment => "own_equipment",
            DryingMethod::Rented => "rented",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "own_equipment" | "alat_sendiri" | "alat sendiri" => Some(DryingMethod::OwnEquipment),
            "rented" | "sewa" => Some(DryingMethod::Rented),
            _ => None,
        }
    }
}

/// Input for recording a drying run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDrying {
    pub date: NaiveDate,
    #[serde(default)]
    pub initial_weight_kg: Option<Decimal>,
    #[serde(default)]
    pub dried_weight_kg: Option<Decimal>,
    #[serde(default)]
    pub method: DryingMethod,
    #[serde(default)]
    pub cost: Decimal,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewDrying {
    pub fn weight_loss_kg(&self) -> Decimal {
        weight_loss(self.initial_weight_kg, self.dried_weight_kg)
    }
}

/// Shrinkage from drying; zero unless both weights are known
pub fn weight_loss(initial: Option<Decimal>, dried: Option<Decimal>) -> Decimal {
    match (initial, dried) {
        (Some(initial), Some(dried)) => initial.saturating_sub(dried),
        _ => Decimal::ZERO,
    }
}

/// A recorded drying run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Drying {
    pub id: Uuid,
    pub date: NaiveDate,
    pub initial_weight_kg: Option<Decimal>,
    pub dried_weight_kg: Option<Decimal>,
    pub method: DryingMethod,
    pub cost: Decimal,
    pub weight_loss_kg: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Drying {
    pub fn from_new(id: Uuid, input: NewDrying, created_at: DateTime<Utc>) -> Self {
        let weight_loss_kg = input.weight_loss_kg();
        Self {
            id,
            date: input.date,
            initial_weight_kg: input.initial_weight_kg,
            dried_weight_kg: input.dried_weight_kg,
            method: input.method,
            cost: input.cost,
            weight_loss_kg,
            note: input.note,
            created_at,
        }
    }
}
