//! HTTP handlers for production (milling) endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use shared::{NewProduction, Production};

use super::query::DateQuery;
use crate::error::AppResult;
use crate::services::{MovementProcessor, RecordService};
use crate::AppState;

/// Record a milling run: grain out, rice and by-products in
pub async fn create_production(
    State(state): State<AppState>,
    Json(input): Json<NewProduction>,
) -> AppResult<(StatusCode, Json<Production>)> {
    let processor = MovementProcessor::new(state.store);
    let production = processor.create_production(input).await?;
    Ok((StatusCode::CREATED, Json(production)))
}

pub async fn list_productions(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<Production>>> {
    let service = RecordService::new(state.store);
    let productions = service.list_productions(query.range()?).await?;
    Ok(Json(productions))
}
