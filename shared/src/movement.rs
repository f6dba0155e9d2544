//! Movement planning
//!
//! Pure computation of the stock deltas a business event implies. A plan is
//! built before any storage is touched; the backend locks the plan's items,
//! checks feasibility against the locked quantities and only then writes.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    item, Direction, NewBusinessRecord, NewDrying, NewProduction, NewPurchase, NewSale, SourceType,
};

/// A single stock change, not yet applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMovement {
    pub item_name: &'static str,
    pub direction: Direction,
    pub amount_kg: Decimal,
}

impl PlannedMovement {
    pub fn signed_amount(&self) -> Decimal {
        self.direction.signed(self.amount_kg)
    }
}

/// Every stock change one event will make, in application order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementPlan {
    pub source_type: SourceType,
    pub movements: Vec<PlannedMovement>,
    pub note: Option<String>,
}

/// Stock available for an item is lower than what a plan takes out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    pub item_name: String,
    pub available: Decimal,
    pub requested: Decimal,
}

impl Shortfall {
    pub fn missing(&self) -> Decimal {
        self.requested - self.available
    }
}

impl MovementPlan {
    pub fn new(source_type: SourceType) -> Self {
        Self {
            source_type,
            movements: Vec::new(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Zero amounts are dropped; they must never produce a log row
    pub fn push(&mut self, item_name: &'static str, direction: Direction, amount_kg: Decimal) {
        if amount_kg.is_zero() {
            return;
        }
        self.movements.push(PlannedMovement {
            item_name,
            direction,
            amount_kg,
        });
    }

    pub fn incoming(mut self, item_name: &'static str, amount_kg: Decimal) -> Self {
        self.push(item_name, Direction::In, amount_kg);
        self
    }

    pub fn outgoing(mut self, item_name: &'static str, amount_kg: Decimal) -> Self {
        self.push(item_name, Direction::Out, amount_kg);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    /// Affected items in ascending name order, each once.
    /// Locks must be taken in this order.
    pub fn lock_order(&self) -> Vec<&'static str> {
        self.net_deltas().into_keys().collect()
    }

    /// Net signed change per item
    pub fn net_deltas(&self) -> BTreeMap<&'static str, Decimal> {
        let mut deltas = BTreeMap::new();
        for m in &self.movements {
            let delta = deltas.entry(m.item_name).or_insert(Decimal::ZERO);
            *delta = delta.saturating_add(m.signed_amount());
        }
        deltas
    }

    /// Check every item stays non-negative given the current quantities.
    /// Reports the first item (by name) that would go negative.
    pub fn check_feasibility<F>(&self, mut available: F) -> Result<(), Shortfall>
    where
        F: FnMut(&str) -> Decimal,
    {
        for (item_name, delta) in self.net_deltas() {
            let on_hand = available(item_name);
            if on_hand.saturating_add(delta) < Decimal::ZERO {
                return Err(Shortfall {
                    item_name: item_name.to_string(),
                    available: on_hand,
                    requested: -delta,
                });
            }
        }
        Ok(())
    }
}

/// Business inputs that translate into stock movements
pub trait GeneratesMovements {
    fn movement_plan(&self) -> MovementPlan;
}

/// Generated description, followed by the user's own note when given
fn describe(generated: String, note: Option<&String>) -> String {
    match note.map(|n| n.trim()).filter(|n| !n.is_empty()) {
        Some(note) => format!("{}: {}", generated, note),
        None => generated,
    }
}

impl GeneratesMovements for NewPurchase {
    fn movement_plan(&self) -> MovementPlan {
        MovementPlan::new(SourceType::Purchase)
            .incoming(self.stock_item(), self.weight_kg)
            .with_note(describe(
                format!("purchase from {}", self.supplier.trim()),
                self.note.as_ref(),
            ))
    }
}

impl GeneratesMovements for NewProduction {
    fn movement_plan(&self) -> MovementPlan {
        let mut plan = MovementPlan::new(SourceType::Production)
            .outgoing(self.source.stock_item(), self.input_weight_kg);
        for (item_name, kg) in self.outputs() {
            plan.push(item_name, Direction::In, kg);
        }
        let generated = match &self.rice_type {
            Some(rice_type) if !rice_type.trim().is_empty() => {
                format!("milling {}", rice_type.trim())
            }
            _ => "milling".to_string(),
        };
        plan.with_note(describe(generated, self.note.as_ref()))
    }
}

impl GeneratesMovements for NewSale {
    fn movement_plan(&self) -> MovementPlan {
        MovementPlan::new(SourceType::Sale)
            .outgoing(self.stock_item(), self.quantity_kg)
            .with_note(describe(
                format!("sale to {}", self.buyer.trim()),
                self.note.as_ref(),
            ))
    }
}

impl GeneratesMovements for NewDrying {
    fn movement_plan(&self) -> MovementPlan {
        MovementPlan::new(SourceType::Drying)
            .outgoing(item::GABAH_BASAH, self.initial_weight_kg.unwrap_or_default())
            .incoming(item::GABAH_KERING, self.dried_weight_kg.unwrap_or_default())
            .with_note(describe(
                format!("drying ({})", self.method.as_str()),
                self.note.as_ref(),
            ))
    }
}

impl GeneratesMovements for NewBusinessRecord {
    fn movement_plan(&self) -> MovementPlan {
        match self {
            NewBusinessRecord::Purchase(p) => p.movement_plan(),
            NewBusinessRecord::Production(p) => p.movement_plan(),
            NewBusinessRecord::Sale(s) => s.movement_plan(),
            NewBusinessRecord::Drying(d) => d.movement_plan(),
        }
    }
}
