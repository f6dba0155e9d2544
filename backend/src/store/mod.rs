//! Storage layer
//!
//! Services talk to storage only through [`InventoryStore`]. A stock-affecting
//! event runs inside one [`StockTransaction`]: lock the affected items, read
//! their quantities, apply deltas, insert the record, append the log, commit.
//! Dropping a transaction without committing discards every write.

mod error;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{
    BusinessRecord, DateRange, Drying, Expense, NewBusinessRecord, NewExpense, NewStockMovement,
    Production, Purchase, Sale, StockItem, StockMovement, MAX_QUANTITY_KG,
};

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Query for the transaction log, always newest first
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    pub item: Option<String>,
    pub limit: Option<usize>,
}

/// Ledger and full log read at one point in time, log newest first
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub items: Vec<StockItem>,
    pub movements: Vec<StockMovement>,
}

/// Read access and transaction entry point
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Open a transaction for one business event
    async fn begin(&self) -> StoreResult<Box<dyn StockTransaction>>;

    async fn stock_items(&self) -> StoreResult<Vec<StockItem>>;

    /// Current quantity; 0 for an item never seen
    async fn stock_quantity(&self, item: &str) -> StoreResult<Decimal>;

    async fn movements(&self, filter: MovementFilter) -> StoreResult<Vec<StockMovement>>;

    /// Items and log together, with no event committed between the two reads
    async fn ledger_snapshot(&self) -> StoreResult<LedgerSnapshot>;

    async fn purchases(&self, range: Option<DateRange>) -> StoreResult<Vec<Purchase>>;

    async fn productions(&self, range: Option<DateRange>) -> StoreResult<Vec<Production>>;

    async fn sales(&self, range: Option<DateRange>) -> StoreResult<Vec<Sale>>;

    async fn dryings(&self, range: Option<DateRange>) -> StoreResult<Vec<Drying>>;

    async fn expenses(&self, range: Option<DateRange>) -> StoreResult<Vec<Expense>>;

    /// Expenses have no stock effect and are written outside a stock transaction
    async fn insert_expense(&self, input: NewExpense) -> StoreResult<Expense>;

    /// Connectivity check for the health endpoint
    async fn ping(&self) -> StoreResult<()>;
}

/// Writes for a single business event
#[async_trait]
pub trait StockTransaction: Send {
    /// Lock an item for the rest of the transaction and return its quantity.
    /// Unknown items are created at zero.
    async fn lock_item(&mut self, item: &str) -> StoreResult<Decimal>;

    /// Add a signed delta to a locked item and return the new quantity
    async fn apply_delta(&mut self, item: &str, delta: Decimal) -> StoreResult<Decimal>;

    async fn insert_record(&mut self, record: NewBusinessRecord) -> StoreResult<BusinessRecord>;

    async fn append_movement(&mut self, movement: NewStockMovement) -> StoreResult<StockMovement>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}

/// Shared guard for ledger writes: reject results below zero or above
/// [`MAX_QUANTITY_KG`]
pub(crate) fn checked_quantity(item: &str, current: Decimal, delta: Decimal) -> StoreResult<Decimal> {
    let next = current
        .checked_add(delta)
        .filter(|next| *next <= MAX_QUANTITY_KG)
        .ok_or_else(|| StoreError::CapacityExceeded {
            item: item.to_string(),
            current,
            delta,
            max: MAX_QUANTITY_KG,
        })?;
    if next < Decimal::ZERO {
        return Err(StoreError::InsufficientStock {
            item: item.to_string(),
            available: current,
            requested: -delta,
        });
    }
    Ok(next)
}
