//! Stock-affecting business records and the recent activity feed

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    Drying, Expense, NewDrying, NewProduction, NewPurchase, NewSale, Production, Purchase, Sale,
    SourceType,
};

/// A record to be inserted alongside its stock movements
#[derive(Debug, Clone, PartialEq)]
pub enum NewBusinessRecord {
    Purchase(NewPurchase),
    Production(NewProduction),
    Sale(NewSale),
    Drying(NewDrying),
}

impl NewBusinessRecord {
    pub fn source_type(&self) -> SourceType {
        match self {
            NewBusinessRecord::Purchase(_) => SourceType::Purchase,
            NewBusinessRecord::Production(_) => SourceType::Production,
            NewBusinessRecord::Sale(_) => SourceType::Sale,
            NewBusinessRecord::Drying(_) => SourceType::Drying,
        }
    }

    /// Materialize the record once storage has assigned an id
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> BusinessRecord {
        match self {
            NewBusinessRecord::Purchase(p) => {
                BusinessRecord::Purchase(Purchase::from_new(id, p, created_at))
            }
            NewBusinessRecord::Production(p) => {
                BusinessRecord::Production(Production::from_new(id, p, created_at))
            }
            NewBusinessRecord::Sale(s) => BusinessRecord::Sale(Sale::from_new(id, s, created_at)),
            NewBusinessRecord::Drying(d) => {
                BusinessRecord::Drying(Drying::from_new(id, d, created_at))
            }
        }
    }
}

/// Any persisted record that produced stock movements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BusinessRecord {
    Purchase(Purchase),
    Production(Production),
    Sale(Sale),
    Drying(Drying),
}

impl BusinessRecord {
    pub fn id(&self) -> Uuid {
        match self {
            BusinessRecord::Purchase(r) => r.id,
            BusinessRecord::Production(r) => r.id,
            BusinessRecord::Sale(r) => r.id,
            BusinessRecord::Drying(r) => r.id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            BusinessRecord::Purchase(r) => r.date,
            BusinessRecord::Production(r) => r.date,
            BusinessRecord::Sale(r) => r.date,
            BusinessRecord::Drying(r) => r.date,
        }
    }

    pub fn source_type(&self) -> SourceType {
        match self {
            BusinessRecord::Purchase(_) => SourceType::Purchase,
            BusinessRecord::Production(_) => SourceType::Production,
            BusinessRecord::Sale(_) => SourceType::Sale,
            BusinessRecord::Drying(_) => SourceType::Drying,
        }
    }
}

/// Kinds of entries shown in the recent activity feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Purchase,
    Sale,
    Expense,
}

/// One line of the dashboard activity feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentTransaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<&Purchase> for RecentTransaction {
    fn from(p: &Purchase) -> Self {
        Self {
            id: p.id,
            kind: TransactionKind::Purchase,
            date: p.date,
            description: format!("{} {} kg from {}", p.product_kind, p.weight_kg, p.supplier),
            amount: p.total_price,
            created_at: p.created_at,
        }
    }
}

impl From<&Sale> for RecentTransaction {
    fn from(s: &Sale) -> Self {
        Self {
            id: s.id,
            kind: TransactionKind::Sale,
            date: s.date,
            description: format!("{} {} kg to {}", s.product_kind, s.quantity_kg, s.buyer),
            amount: s.total_price,
            created_at: s.created_at,
        }
    }
}

impl From<&Expense> for RecentTransaction {
    fn from(e: &Expense) -> Self {
        Self {
            id: e.id,
            kind: TransactionKind::Expense,
            date: e.date,
            description: e.category.clone(),
            amount: e.amount,
            created_at: e.created_at,
        }
    }
}

/// Merge purchases, sales and expenses, newest first
pub fn merge_recent(
    purchases: &[Purchase],
    sales: &[Sale],
    expenses: &[Expense],
    limit: usize,
) -> Vec<RecentTransaction> {
    let mut feed: Vec<RecentTransaction> = purchases
        .iter()
        .map(RecentTransaction::from)
        .chain(sales.iter().map(RecentTransaction::from))
        .chain(expenses.iter().map(RecentTransaction::from))
        .collect();

    feed.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    feed.truncate(limit);
    feed
}
