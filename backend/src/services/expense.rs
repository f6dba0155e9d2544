//! Expense service: operating costs with no stock effect

use std::sync::Arc;

use shared::{validate_expense, DateRange, Expense, NewExpense};

use crate::error::AppResult;
use crate::store::InventoryStore;

#[derive(Clone)]
pub struct ExpenseService {
    store: Arc<dyn InventoryStore>,
}

impl ExpenseService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    pub async fn create_expense(&self, input: NewExpense) -> AppResult<Expense> {
        if let Err(err) = validate_expense(&input) {
            tracing::warn!(field = %err.field, "Rejected expense: {}", err.message);
            return Err(err.into());
        }

        let expense = self.store.insert_expense(input).await?;
        tracing::info!(
            expense_id = %expense.id,
            category = %expense.category,
            amount = %expense.amount,
            "Recorded expense"
        );
        Ok(expense)
    }

    pub async fn list_expenses(&self, range: Option<DateRange>) -> AppResult<Vec<Expense>> {
        Ok(self.store.expenses(range).await?)
    }
}
