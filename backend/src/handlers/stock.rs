//! HTTP handlers for the stock ledger and transaction log

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::{ReconciliationReport, StockItem};

use super::query::{parse_format, Format};
use crate::error::AppResult;
use crate::services::{ReportingService, StockService};
use crate::store::MovementFilter;
use crate::AppState;

#[derive(Deserialize)]
pub struct MovementQuery {
    pub item: Option<String>,
    pub limit: Option<usize>,
    pub format: Option<String>, // "json" or "csv"
}

/// Current quantity of every item
pub async fn list_stock(State(state): State<AppState>) -> AppResult<Json<Vec<StockItem>>> {
    let service = StockService::new(state.store);
    let items = service.list_stock().await?;
    Ok(Json(items))
}

/// Transaction log, newest first
pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementQuery>,
) -> AppResult<impl IntoResponse> {
    let format = parse_format(query.format.as_deref())?;
    let service = StockService::new(state.store);

    let filter = MovementFilter {
        item: query.item.filter(|i| !i.trim().is_empty()),
        limit: query.limit,
    };
    let movements = service.list_movements(filter).await?;

    if format == Format::Csv {
        let csv = ReportingService::export_to_csv(&movements)?;
        Ok((
            [(header::CONTENT_TYPE, "text/csv"), (header::CONTENT_DISPOSITION, "attachment; filename=\"stock_movements.csv\"")],
            csv,
        ).into_response())
    } else {
        Ok(Json(movements).into_response())
    }
}

/// Ledger vs. log comparison per item
pub async fn get_reconciliation(
    State(state): State<AppState>,
) -> AppResult<Json<ReconciliationReport>> {
    let service = StockService::new(state.store);
    let report = service.reconciliation().await?;
    Ok(Json(report))
}
