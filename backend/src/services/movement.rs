//! Movement processor: applies stock-affecting business events
//!
//! Each event is validated, turned into a movement plan, and applied inside
//! one store transaction. Items are locked in ascending name order before
//! feasibility is checked against the locked quantities; any failure before
//! commit drops the transaction and leaves no trace.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use shared::{
    validate_record, BusinessRecord, Drying, GeneratesMovements, NewBusinessRecord, NewDrying,
    NewProduction, NewPurchase, NewSale, NewStockMovement, Production, Purchase, Sale,
};

use crate::error::{AppError, AppResult};
use crate::store::InventoryStore;

#[derive(Clone)]
pub struct MovementProcessor {
    store: Arc<dyn InventoryStore>,
}

impl MovementProcessor {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    pub async fn create_purchase(&self, input: NewPurchase) -> AppResult<Purchase> {
        match self.record(NewBusinessRecord::Purchase(input)).await? {
            BusinessRecord::Purchase(purchase) => Ok(purchase),
            other => Err(unexpected_record("purchase", &other)),
        }
    }

    pub async fn create_production(&self, input: NewProduction) -> AppResult<Production> {
        match self.record(NewBusinessRecord::Production(input)).await? {
            BusinessRecord::Production(production) => Ok(production),
            other => Err(unexpected_record("production", &other)),
        }
    }

    pub async fn create_sale(&self, input: NewSale) -> AppResult<Sale> {
        match self.record(NewBusinessRecord::Sale(input)).await? {
            BusinessRecord::Sale(sale) => Ok(sale),
            other => Err(unexpected_record("sale", &other)),
        }
    }

    pub async fn create_drying(&self, input: NewDrying) -> AppResult<Drying> {
        match self.record(NewBusinessRecord::Drying(input)).await? {
            BusinessRecord::Drying(drying) => Ok(drying),
            other => Err(unexpected_record("drying", &other)),
        }
    }

    /// Apply one event atomically: record insert, ledger deltas and log entries
    pub async fn record(&self, input: NewBusinessRecord) -> AppResult<BusinessRecord> {
        if let Err(err) = validate_record(&input) {
            tracing::warn!(
                source = %input.source_type(),
                field = %err.field,
                "Rejected event: {}",
                err.message
            );
            return Err(err.into());
        }

        let plan = input.movement_plan();
        let mut tx = self.store.begin().await?;

        let mut on_hand: BTreeMap<&'static str, Decimal> = BTreeMap::new();
        for item in plan.lock_order() {
            let quantity = tx.lock_item(item).await?;
            on_hand.insert(item, quantity);
        }

        if let Err(shortfall) =
            plan.check_feasibility(|item| on_hand.get(item).copied().unwrap_or_default())
        {
            tracing::warn!(
                source = %plan.source_type,
                item = %shortfall.item_name,
                available = %shortfall.available,
                requested = %shortfall.requested,
                "Rejected event: insufficient stock"
            );
            return Err(AppError::InsufficientStock {
                item: shortfall.item_name,
                available: shortfall.available,
                requested: shortfall.requested,
            });
        }

        let record = tx.insert_record(input).await?;
        let record_id = record.id();

        for movement in &plan.movements {
            let before = on_hand
                .get(movement.item_name)
                .copied()
                .unwrap_or_default();
            let after = tx
                .apply_delta(movement.item_name, movement.signed_amount())
                .await?;
            on_hand.insert(movement.item_name, after);

            tx.append_movement(NewStockMovement {
                item_name: movement.item_name.to_string(),
                direction: movement.direction,
                amount_kg: movement.amount_kg,
                quantity_before_kg: before,
                quantity_after_kg: after,
                source_type: plan.source_type,
                source_record_id: record_id,
                note: plan.note.clone(),
            })
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            source = %plan.source_type,
            record_id = %record_id,
            movements = plan.movements.len(),
            "Recorded event"
        );

        Ok(record)
    }
}

fn unexpected_record(expected: &str, got: &BusinessRecord) -> AppError {
    AppError::Internal(format!(
        "expected {} record, store returned {}",
        expected,
        got.source_type()
    ))
}
