//! Miscellaneous operating expenses

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Input for recording an expense. Expenses never touch stock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn from_new(id: Uuid, input: NewExpense, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            date: input.date,
            category: input.category,
            amount: input.amount,
            note: input.note,
            created_at,
        }
    }
}
