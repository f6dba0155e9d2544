//! HTTP handlers for purchase endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use shared::{NewPurchase, Purchase};

use super::query::DateQuery;
use crate::error::AppResult;
use crate::services::{MovementProcessor, RecordService};
use crate::AppState;

/// Record a purchase and book the goods into stock
pub async fn create_purchase(
    State(state): State<AppState>,
    Json(input): Json<NewPurchase>,
) -> AppResult<(StatusCode, Json<Purchase>)> {
    let processor = MovementProcessor::new(state.store);
    let purchase = processor.create_purchase(input).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

/// List purchases, newest first
pub async fn list_purchases(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<Purchase>>> {
    let service = RecordService::new(state.store);
    let purchases = service.list_purchases(query.range()?).await?;
    Ok(Json(purchases))
}
