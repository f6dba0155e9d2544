//! HTTP handlers for expense endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use shared::{Expense, NewExpense};

use super::query::DateQuery;
use crate::error::AppResult;
use crate::services::ExpenseService;
use crate::AppState;

/// Record an operating expense
pub async fn create_expense(
    State(state): State<AppState>,
    Json(input): Json<NewExpense>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let service = ExpenseService::new(state.store);
    let expense = service.create_expense(input).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<Expense>>> {
    let service = ExpenseService::new(state.store);
    let expenses = service.list_expenses(query.range()?).await?;
    Ok(Json(expenses))
}
