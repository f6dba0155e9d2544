//! In-memory store
//!
//! Backs tests and database-less local runs. Each stock item has its own
//! async mutex; a transaction holds the guards of every item it locked
//! until commit or drop, so events on the same item serialize while events
//! on disjoint items run in parallel. Writes are staged on the transaction
//! and published under one short state lock at commit.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::{
    in_range, BusinessRecord, DateRange, Drying, Expense, NewBusinessRecord, NewExpense,
    NewStockMovement, Production, Purchase, Sale, StockItem, StockMovement,
};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use super::{
    checked_quantity, InventoryStore, LedgerSnapshot, MovementFilter, StockTransaction, StoreError,
    StoreResult,
};

#[derive(Default)]
struct MemoryState {
    stock: BTreeMap<String, StockItem>,
    movements: Vec<StockMovement>,
    purchases: Vec<Purchase>,
    productions: Vec<Production>,
    sales: Vec<Sale>,
    dryings: Vec<Drying>,
    expenses: Vec<Expense>,
}

#[derive(Default)]
struct Inner {
    item_locks: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
    state: Mutex<MemoryState>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first: later date, then later insertion
fn newest_first<T: Clone>(
    rows: &[T],
    range: Option<DateRange>,
    date: impl Fn(&T) -> chrono::NaiveDate,
) -> Vec<T> {
    let mut out: Vec<T> = rows
        .iter()
        .rev()
        .filter(|row| in_range(range.as_ref(), date(*row)))
        .cloned()
        .collect();
    // stable sort keeps insertion order (already reversed) within a day
    out.sort_by(|a, b| date(b).cmp(&date(a)));
    out
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StockTransaction>> {
        Ok(Box::new(MemoryTransaction {
            inner: Arc::clone(&self.inner),
            guards: BTreeMap::new(),
            quantities: BTreeMap::new(),
            records: Vec::new(),
            movements: Vec::new(),
        }))
    }

    async fn stock_items(&self) -> StoreResult<Vec<StockItem>> {
        Ok(self.inner.state.lock().stock.values().cloned().collect())
    }

    async fn stock_quantity(&self, item: &str) -> StoreResult<Decimal> {
        Ok(self
            .inner
            .state
            .lock()
            .stock
            .get(item)
            .map(|s| s.quantity_kg)
            .unwrap_or_default())
    }

    async fn movements(&self, filter: MovementFilter) -> StoreResult<Vec<StockMovement>> {
        let state = self.inner.state.lock();
        let matching = state
            .movements
            .iter()
            .rev()
            .filter(|m| filter.item.as_deref().map_or(true, |item| m.item_name == item));
        Ok(match filter.limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        })
    }

    async fn ledger_snapshot(&self) -> StoreResult<LedgerSnapshot> {
        let state = self.inner.state.lock();
        Ok(LedgerSnapshot {
            items: state.stock.values().cloned().collect(),
            movements: state.movements.iter().rev().cloned().collect(),
        })
    }

    async fn purchases(&self, range: Option<DateRange>) -> StoreResult<Vec<Purchase>> {
        Ok(newest_first(&self.inner.state.lock().purchases, range, |p| p.date))
    }

    async fn productions(&self, range: Option<DateRange>) -> StoreResult<Vec<Production>> {
        Ok(newest_first(&self.inner.state.lock().productions, range, |p| p.date))
    }

    async fn sales(&self, range: Option<DateRange>) -> StoreResult<Vec<Sale>> {
        Ok(newest_first(&self.inner.state.lock().sales, range, |s| s.date))
    }

    async fn dryings(&self, range: Option<DateRange>) -> StoreResult<Vec<Drying>> {
        Ok(newest_first(&self.inner.state.lock().dryings, range, |d| d.date))
    }

    async fn expenses(&self, range: Option<DateRange>) -> StoreResult<Vec<Expense>> {
        Ok(newest_first(&self.inner.state.lock().expenses, range, |e| e.date))
    }

    async fn insert_expense(&self, input: NewExpense) -> StoreResult<Expense> {
        let expense = Expense::from_new(Uuid::new_v4(), input, Utc::now());
        self.inner.state.lock().expenses.push(expense.clone());
        Ok(expense)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

pub struct MemoryTransaction {
    inner: Arc<Inner>,
    guards: BTreeMap<String, OwnedMutexGuard<()>>,
    /// Staged quantity per locked item
    quantities: BTreeMap<String, Decimal>,
    records: Vec<BusinessRecord>,
    movements: Vec<StockMovement>,
}

#[async_trait]
impl StockTransaction for MemoryTransaction {
    async fn lock_item(&mut self, item: &str) -> StoreResult<Decimal> {
        if let Some(quantity) = self.quantities.get(item) {
            return Ok(*quantity);
        }

        let lock = self
            .inner
            .item_locks
            .entry(item.to_string())
            .or_default()
            .value()
            .clone();
        let guard = lock.lock_owned().await;

        let quantity = self
            .inner
            .state
            .lock()
            .stock
            .get(item)
            .map(|s| s.quantity_kg)
            .unwrap_or_default();

        self.guards.insert(item.to_string(), guard);
        self.quantities.insert(item.to_string(), quantity);
        Ok(quantity)
    }

    async fn apply_delta(&mut self, item: &str, delta: Decimal) -> StoreResult<Decimal> {
        let current = self
            .quantities
            .get_mut(item)
            .ok_or_else(|| StoreError::NotLocked(item.to_string()))?;
        let next = checked_quantity(item, *current, delta)?;
        *current = next;
        Ok(next)
    }

    async fn insert_record(&mut self, record: NewBusinessRecord) -> StoreResult<BusinessRecord> {
        let record = record.into_record(Uuid::new_v4(), Utc::now());
        self.records.push(record.clone());
        Ok(record)
    }

    async fn append_movement(&mut self, movement: NewStockMovement) -> StoreResult<StockMovement> {
        let movement = StockMovement {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            item_name: movement.item_name,
            direction: movement.direction,
            amount_kg: movement.amount_kg,
            quantity_before_kg: movement.quantity_before_kg,
            quantity_after_kg: movement.quantity_after_kg,
            source_type: movement.source_type,
            source_record_id: movement.source_record_id,
            note: movement.note,
        };
        self.movements.push(movement.clone());
        Ok(movement)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction {
            inner,
            guards,
            quantities,
            records,
            movements,
        } = *self;

        {
            let mut state = inner.state.lock();
            let now = Utc::now();
            for (name, quantity_kg) in quantities {
                state.stock.insert(
                    name.clone(),
                    StockItem {
                        name,
                        quantity_kg,
                        updated_at: now,
                    },
                );
            }
            state.movements.extend(movements);
            for record in records {
                match record {
                    BusinessRecord::Purchase(r) => state.purchases.push(r),
                    BusinessRecord::Production(r) => state.productions.push(r),
                    BusinessRecord::Sale(r) => state.sales.push(r),
                    BusinessRecord::Drying(r) => state.dryings.push(r),
                }
            }
        }

        drop(guards);
        Ok(())
    }
}
