//! HTTP handlers for drying endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use shared::{Drying, NewDrying};

use super::query::DateQuery;
use crate::error::AppResult;
use crate::services::{MovementProcessor, RecordService};
use crate::AppState;

pub async fn create_drying(
    State(state): State<AppState>,
    Json(input): Json<NewDrying>,
) -> AppResult<(StatusCode, Json<Drying>)> {
    let processor = MovementProcessor::new(state.store);
    let drying = processor.create_drying(input).await?;
    Ok((StatusCode::CREATED, Json(drying)))
}

pub async fn list_dryings(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<Drying>>> {
    let service = RecordService::new(state.store);
    let dryings = service.list_dryings(query.range()?).await?;
    Ok(Json(dryings))
}
