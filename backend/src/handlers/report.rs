//! Reporting handlers for cash flow and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::query::{parse_format, Format};
use crate::error::AppResult;
use crate::services::ReportingService;
use crate::AppState;

#[derive(Deserialize)]
pub struct CashFlowQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// Weekly cash flow; CSV returns the daily series only
pub async fn get_cash_flow(
    State(state): State<AppState>,
    Query(query): Query<CashFlowQuery>,
) -> AppResult<impl IntoResponse> {
    let format = parse_format(query.format.as_deref())?;
    let business = &state.config.business;
    let service = ReportingService::new(state.store.clone());

    let report = service
        .cash_flow(business.today(), business.opening_capital)
        .await?;

    if format == Format::Csv {
        let csv = ReportingService::export_to_csv(&report.daily)?;
        Ok((
            [(header::CONTENT_TYPE, "text/csv"), (header::CONTENT_DISPOSITION, "attachment; filename=\"cash_flow.csv\"")],
            csv,
        ).into_response())
    } else {
        Ok(Json(report).into_response())
    }
}
