//! Stock ledger queries: current levels, transaction log, reconciliation

use std::sync::Arc;

use shared::{ReconciliationReport, StockItem, StockMovement};

use crate::error::AppResult;
use crate::store::{InventoryStore, MovementFilter};

#[derive(Clone)]
pub struct StockService {
    store: Arc<dyn InventoryStore>,
}

impl StockService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    pub async fn list_stock(&self) -> AppResult<Vec<StockItem>> {
        Ok(self.store.stock_items().await?)
    }

    pub async fn list_movements(&self, filter: MovementFilter) -> AppResult<Vec<StockMovement>> {
        Ok(self.store.movements(filter).await?)
    }

    /// Compare each ledger quantity with the signed sum of its log entries
    pub async fn reconciliation(&self) -> AppResult<ReconciliationReport> {
        let snapshot = self.store.ledger_snapshot().await?;
        let report = ReconciliationReport::build(&snapshot.items, &snapshot.movements);

        if !report.balanced {
            for line in report.items.iter().filter(|l| !l.matches) {
                tracing::error!(
                    item = %line.item_name,
                    ledger_kg = %line.ledger_kg,
                    movement_sum_kg = %line.movement_sum_kg,
                    "Stock ledger out of balance"
                );
            }
        }
        Ok(report)
    }
}
