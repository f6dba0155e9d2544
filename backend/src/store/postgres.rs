//! PostgreSQL store
//!
//! Item rows are locked with `SELECT ... FOR UPDATE` inside the event's
//! database transaction. Derived figures (totals, rendemen, weight loss) are
//! not stored; they are recomputed when rows are mapped back.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    BusinessRecord, DateRange, Direction, Drying, DryingMethod, Expense, GrainSource,
    GrainStatus, NewBusinessRecord, NewDrying, NewExpense, NewProduction, NewPurchase, NewSale,
    NewStockMovement, PaymentStatus, ProductKind, Production, Purchase, Sale, SourceType,
    StockItem, StockMovement,
};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    checked_quantity, InventoryStore, LedgerSnapshot, MovementFilter, StockTransaction, StoreError,
    StoreResult,
};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }
}

/// Open bounds are passed as NULL; chrono's extreme dates are outside
/// the PostgreSQL date range.
fn bounds(range: Option<DateRange>) -> (Option<NaiveDate>, Option<NaiveDate>) {
    match range {
        None => (None, None),
        Some(r) => (
            (r.start != NaiveDate::MIN).then_some(r.start),
            (r.end != NaiveDate::MAX).then_some(r.end),
        ),
    }
}

fn corrupt(table: &'static str, column: &str, value: &str) -> StoreError {
    StoreError::CorruptRow {
        table,
        message: format!("unknown {} '{}'", column, value),
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(Debug, FromRow)]
struct StockItemRow {
    name: String,
    quantity_kg: Decimal,
    updated_at: DateTime<Utc>,
}

impl From<StockItemRow> for StockItem {
    fn from(row: StockItemRow) -> Self {
        Self {
            name: row.name,
            quantity_kg: row.quantity_kg,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    item_name: String,
    direction: String,
    amount_kg: Decimal,
    quantity_before_kg: Decimal,
    quantity_after_kg: Decimal,
    source_type: String,
    source_record_id: Uuid,
    note: Option<String>,
}

impl TryFrom<MovementRow> for StockMovement {
    type Error = StoreError;

    fn try_from(row: MovementRow) -> StoreResult<Self> {
        let direction = Direction::parse(&row.direction)
            .ok_or_else(|| corrupt("stock_movements", "direction", &row.direction))?;
        let source_type = SourceType::parse(&row.source_type)
            .ok_or_else(|| corrupt("stock_movements", "source_type", &row.source_type))?;
        Ok(Self {
            id: row.id,
            timestamp: row.created_at,
            item_name: row.item_name,
            direction,
            amount_kg: row.amount_kg,
            quantity_before_kg: row.quantity_before_kg,
            quantity_after_kg: row.quantity_after_kg,
            source_type,
            source_record_id: row.source_record_id,
            note: row.note,
        })
    }
}

#[derive(Debug, FromRow)]
struct PurchaseRow {
    id: Uuid,
    date: NaiveDate,
    supplier: String,
    product_kind: String,
    status: Option<String>,
    weight_kg: Decimal,
    unit_price: Decimal,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = StoreError;

    fn try_from(row: PurchaseRow) -> StoreResult<Self> {
        let product_kind = ProductKind::parse(&row.product_kind)
            .ok_or_else(|| corrupt("purchases", "product_kind", &row.product_kind))?;
        let status = match row.status.as_deref() {
            Some(s) => Some(GrainStatus::parse(s).ok_or_else(|| corrupt("purchases", "status", s))?),
            None => None,
        };
        let input = NewPurchase {
            date: row.date,
            supplier: row.supplier,
            product_kind,
            status,
            weight_kg: row.weight_kg,
            unit_price: row.unit_price,
            note: row.note,
        };
        Ok(Purchase::from_new(row.id, input, row.created_at))
    }
}

#[derive(Debug, FromRow)]
struct ProductionRow {
    id: Uuid,
    date: NaiveDate,
    rice_type: Option<String>,
    source: String,
    input_weight_kg: Decimal,
    rice_kg: Option<Decimal>,
    bran_kg: Option<Decimal>,
    broken_kg: Option<Decimal>,
    fines_kg: Option<Decimal>,
    husk_kg: Option<Decimal>,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductionRow> for Production {
    type Error = StoreError;

    fn try_from(row: ProductionRow) -> StoreResult<Self> {
        let source = GrainSource::parse(&row.source)
            .ok_or_else(|| corrupt("productions", "source", &row.source))?;
        let input = NewProduction {
            date: row.date,
            rice_type: row.rice_type,
            source,
            input_weight_kg: row.input_weight_kg,
            rice_kg: row.rice_kg,
            bran_kg: row.bran_kg,
            broken_kg: row.broken_kg,
            fines_kg: row.fines_kg,
            husk_kg: row.husk_kg,
            note: row.note,
        };
        Ok(Production::from_new(row.id, input, row.created_at))
    }
}

#[derive(Debug, FromRow)]
struct SaleRow {
    id: Uuid,
    date: NaiveDate,
    buyer: String,
    product_kind: String,
    quantity_kg: Decimal,
    unit_price: Decimal,
    payment_status: String,
    due_date: Option<NaiveDate>,
    settled_date: Option<NaiveDate>,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<SaleRow> for Sale {
    type Error = StoreError;

    fn try_from(row: SaleRow) -> StoreResult<Self> {
        let product_kind = ProductKind::parse(&row.product_kind)
            .ok_or_else(|| corrupt("sales", "product_kind", &row.product_kind))?;
        let payment_status = PaymentStatus::parse(&row.payment_status)
            .ok_or_else(|| corrupt("sales", "payment_status", &row.payment_status))?;
        let input = NewSale {
            date: row.date,
            buyer: row.buyer,
            product_kind,
            quantity_kg: row.quantity_kg,
            unit_price: row.unit_price,
            payment_status,
            due_date: row.due_date,
            settled_date: row.settled_date,
            note: row.note,
        };
        Ok(Sale::from_new(row.id, input, row.created_at))
    }
}

#[derive(Debug, FromRow)]
struct DryingRow {
    id: Uuid,
    date: NaiveDate,
    initial_weight_kg: Option<Decimal>,
    dried_weight_kg: Option<Decimal>,
    method: String,
    cost: Decimal,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<DryingRow> for Drying {
    type Error = StoreError;

    fn try_from(row: DryingRow) -> StoreResult<Self> {
        let method = DryingMethod::parse(&row.method)
            .ok_or_else(|| corrupt("dryings", "method", &row.method))?;
        let input = NewDrying {
            date: row.date,
            initial_weight_kg: row.initial_weight_kg,
            dried_weight_kg: row.dried_weight_kg,
            method,
            cost: row.cost,
            note: row.note,
        };
        Ok(Drying::from_new(row.id, input, row.created_at))
    }
}

#[derive(Debug, FromRow)]
struct ExpenseRow {
    id: Uuid,
    date: NaiveDate,
    category: String,
    amount: Decimal,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Self {
            id: row.id,
            date: row.date,
            category: row.category,
            amount: row.amount,
            note: row.note,
            created_at: row.created_at,
        }
    }
}

fn map_rows<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

// ============================================================================
// Reads
// ============================================================================

#[async_trait]
impl InventoryStore for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn StockTransaction>> {
        let tx = self.db.begin().await?;
        Ok(Box::new(PgTransaction {
            tx,
            locked: BTreeMap::new(),
        }))
    }

    async fn stock_items(&self) -> StoreResult<Vec<StockItem>> {
        let rows = sqlx::query_as::<_, StockItemRow>(
            "SELECT name, quantity_kg, updated_at FROM stock_items ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(StockItem::from).collect())
    }

    async fn stock_quantity(&self, item: &str) -> StoreResult<Decimal> {
        let quantity = sqlx::query_scalar::<_, Decimal>(
            "SELECT quantity_kg FROM stock_items WHERE name = $1",
        )
        .bind(item)
        .fetch_optional(&self.db)
        .await?;
        Ok(quantity.unwrap_or_default())
    }

    async fn movements(&self, filter: MovementFilter) -> StoreResult<Vec<StockMovement>> {
        let limit = filter.limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, created_at, item_name, direction, amount_kg, quantity_before_kg,
                   quantity_after_kg, source_type, source_record_id, note
            FROM stock_movements
            WHERE ($1::text IS NULL OR item_name = $1)
            ORDER BY seq DESC
            LIMIT $2
            "#,
        )
        .bind(filter.item)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        map_rows(rows)
    }

    async fn ledger_snapshot(&self) -> StoreResult<LedgerSnapshot> {
        let mut tx = self.db.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let items = sqlx::query_as::<_, StockItemRow>(
            "SELECT name, quantity_kg, updated_at FROM stock_items ORDER BY name",
        )
        .fetch_all(&mut *tx)
        .await?;
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, created_at, item_name, direction, amount_kg, quantity_before_kg,
                   quantity_after_kg, source_type, source_record_id, note
            FROM stock_movements
            ORDER BY seq DESC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(LedgerSnapshot {
            items: items.into_iter().map(StockItem::from).collect(),
            movements: map_rows(rows)?,
        })
    }

    async fn purchases(&self, range: Option<DateRange>) -> StoreResult<Vec<Purchase>> {
        let (start, end) = bounds(range);
        let rows = sqlx::query_as::<_, PurchaseRow>(
            r#"
            SELECT id, date, supplier, product_kind, status, weight_kg, unit_price, note, created_at
            FROM purchases
            WHERE ($1::date IS NULL OR date >= $1) AND ($2::date IS NULL OR date <= $2)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;
        map_rows(rows)
    }

    async fn productions(&self, range: Option<DateRange>) -> StoreResult<Vec<Production>> {
        let (start, end) = bounds(range);
        let rows = sqlx::query_as::<_, ProductionRow>(
            r#"
            SELECT id, date, rice_type, source, input_weight_kg, rice_kg, bran_kg, broken_kg,
                   fines_kg, husk_kg, note, created_at
            FROM productions
            WHERE ($1::date IS NULL OR date >= $1) AND ($2::date IS NULL OR date <= $2)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;
        map_rows(rows)
    }

    async fn sales(&self, range: Option<DateRange>) -> StoreResult<Vec<Sale>> {
        let (start, end) = bounds(range);
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, date, buyer, product_kind, quantity_kg, unit_price, payment_status,
                   due_date, settled_date, note, created_at
            FROM sales
            WHERE ($1::date IS NULL OR date >= $1) AND ($2::date IS NULL OR date <= $2)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;
        map_rows(rows)
    }

    async fn dryings(&self, range: Option<DateRange>) -> StoreResult<Vec<Drying>> {
        let (start, end) = bounds(range);
        let rows = sqlx::query_as::<_, DryingRow>(
            r#"
            SELECT id, date, initial_weight_kg, dried_weight_kg, method, cost, note, created_at
            FROM dryings
            WHERE ($1::date IS NULL OR date >= $1) AND ($2::date IS NULL OR date <= $2)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;
        map_rows(rows)
    }

    async fn expenses(&self, range: Option<DateRange>) -> StoreResult<Vec<Expense>> {
        let (start, end) = bounds(range);
        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT id, date, category, amount, note, created_at
            FROM expenses
            WHERE ($1::date IS NULL OR date >= $1) AND ($2::date IS NULL OR date <= $2)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    async fn insert_expense(&self, input: NewExpense) -> StoreResult<Expense> {
        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            INSERT INTO expenses (date, category, amount, note)
            VALUES ($1, $2, $3, $4)
            RETURNING id, date, category, amount, note, created_at
            "#,
        )
        .bind(input.date)
        .bind(input.category.trim())
        .bind(input.amount)
        .bind(&input.note)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}

// ============================================================================
// Transaction
// ============================================================================

pub struct PgTransaction {
    tx: Transaction<'static, Postgres>,
    /// Quantities of rows locked so far, kept current as deltas apply
    locked: BTreeMap<String, Decimal>,
}

impl PgTransaction {
    async fn insert_returning(
        &mut self,
        record: &NewBusinessRecord,
    ) -> StoreResult<(Uuid, DateTime<Utc>)> {
        let query = match record {
            NewBusinessRecord::Purchase(p) => sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
                r#"
                INSERT INTO purchases (date, supplier, product_kind, status, weight_kg, unit_price, note)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, created_at
                "#,
            )
            .bind(p.date)
            .bind(p.supplier.trim().to_string())
            .bind(p.product_kind.as_str())
            .bind(p.status.map(|s| s.as_str()))
            .bind(p.weight_kg)
            .bind(p.unit_price)
            .bind(p.note.clone()),
            NewBusinessRecord::Production(p) => sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
                r#"
                INSERT INTO productions (date, rice_type, source, input_weight_kg, rice_kg, bran_kg,
                                         broken_kg, fines_kg, husk_kg, note)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING id, created_at
                "#,
            )
            .bind(p.date)
            .bind(p.rice_type.clone())
            .bind(p.source.as_str())
            .bind(p.input_weight_kg)
            .bind(p.rice_kg)
            .bind(p.bran_kg)
            .bind(p.broken_kg)
            .bind(p.fines_kg)
            .bind(p.husk_kg)
            .bind(p.note.clone()),
            NewBusinessRecord::Sale(s) => sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
                r#"
                INSERT INTO sales (date, buyer, product_kind, quantity_kg, unit_price, payment_status,
                                   due_date, settled_date, note)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING id, created_at
                "#,
            )
            .bind(s.date)
            .bind(s.buyer.trim().to_string())
            .bind(s.product_kind.as_str())
            .bind(s.quantity_kg)
            .bind(s.unit_price)
            .bind(s.payment_status.as_str())
            .bind(s.due_date)
            .bind(s.settled_date)
            .bind(s.note.clone()),
            NewBusinessRecord::Drying(d) => sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
                r#"
                INSERT INTO dryings (date, initial_weight_kg, dried_weight_kg, method, cost, note)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, created_at
                "#,
            )
            .bind(d.date)
            .bind(d.initial_weight_kg)
            .bind(d.dried_weight_kg)
            .bind(d.method.as_str())
            .bind(d.cost)
            .bind(d.note.clone()),
        };

        Ok(query.fetch_one(&mut *self.tx).await?)
    }
}

#[async_trait]
impl StockTransaction for PgTransaction {
    async fn lock_item(&mut self, item: &str) -> StoreResult<Decimal> {
        if let Some(quantity) = self.locked.get(item) {
            return Ok(*quantity);
        }

        sqlx::query(
            "INSERT INTO stock_items (name, quantity_kg) VALUES ($1, 0) ON CONFLICT (name) DO NOTHING",
        )
        .bind(item)
        .execute(&mut *self.tx)
        .await?;

        let quantity = sqlx::query_scalar::<_, Decimal>(
            "SELECT quantity_kg FROM stock_items WHERE name = $1 FOR UPDATE",
        )
        .bind(item)
        .fetch_one(&mut *self.tx)
        .await?;

        self.locked.insert(item.to_string(), quantity);
        Ok(quantity)
    }

    async fn apply_delta(&mut self, item: &str, delta: Decimal) -> StoreResult<Decimal> {
        let current = *self
            .locked
            .get(item)
            .ok_or_else(|| StoreError::NotLocked(item.to_string()))?;
        let next = checked_quantity(item, current, delta)?;

        sqlx::query("UPDATE stock_items SET quantity_kg = $2, updated_at = NOW() WHERE name = $1")
            .bind(item)
            .bind(next)
            .execute(&mut *self.tx)
            .await?;

        self.locked.insert(item.to_string(), next);
        Ok(next)
    }

    async fn insert_record(&mut self, record: NewBusinessRecord) -> StoreResult<BusinessRecord> {
        let (id, created_at) = self.insert_returning(&record).await?;
        Ok(record.into_record(id, created_at))
    }

    async fn append_movement(&mut self, movement: NewStockMovement) -> StoreResult<StockMovement> {
        let row = sqlx::query_as::<_, MovementRow>(
            r#"
            INSERT INTO stock_movements (item_name, direction, amount_kg, quantity_before_kg,
                                         quantity_after_kg, source_type, source_record_id, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, created_at, item_name, direction, amount_kg, quantity_before_kg,
                      quantity_after_kg, source_type, source_record_id, note
            "#,
        )
        .bind(&movement.item_name)
        .bind(movement.direction.as_str())
        .bind(movement.amount_kg)
        .bind(movement.quantity_before_kg)
        .bind(movement.quantity_after_kg)
        .bind(movement.source_type.as_str())
        .bind(movement.source_record_id)
        .bind(&movement.note)
        .fetch_one(&mut *self.tx)
        .await?;
        row.try_into()
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_bounds_become_null() {
        let d = NaiveDate::from_ymd_opt(2025, 7, 16).unwrap();

        assert_eq!(bounds(None), (None, None));
        assert_eq!(bounds(DateRange::from_bounds(Some(d), None)), (Some(d), None));
        assert_eq!(bounds(Some(DateRange::day(d))), (Some(d), Some(d)));
    }

    #[test]
    fn test_unknown_enum_value_is_corrupt_row() {
        let row = MovementRow {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            item_name: "beras".to_string(),
            direction: "sideways".to_string(),
            amount_kg: Decimal::ONE,
            quantity_before_kg: Decimal::ZERO,
            quantity_after_kg: Decimal::ONE,
            source_type: "purchase".to_string(),
            source_record_id: Uuid::new_v4(),
            note: None,
        };
        let err = StockMovement::try_from(row).unwrap_err();
        assert!(matches!(err, StoreError::CorruptRow { table: "stock_movements", .. }));
    }
}
