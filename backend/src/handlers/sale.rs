//! HTTP handlers for sale endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use shared::{NewSale, Sale};

use super::query::DateQuery;
use crate::error::AppResult;
use crate::services::{MovementProcessor, RecordService};
use crate::AppState;

/// Record a sale; rejected with 422 when stock is short
pub async fn create_sale(
    State(state): State<AppState>,
    Json(input): Json<NewSale>,
) -> AppResult<(StatusCode, Json<Sale>)> {
    let processor = MovementProcessor::new(state.store);
    let sale = processor.create_sale(input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// List sales, newest first
pub async fn list_sales(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<Sale>>> {
    let service = RecordService::new(state.store);
    let sales = service.list_sales(query.range()?).await?;
    Ok(Json(sales))
}
