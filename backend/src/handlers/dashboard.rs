//! Dashboard handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::RecentTransaction;

use crate::error::AppResult;
use crate::services::reporting::DEFAULT_RECENT_LIMIT;
use crate::services::{DashboardMetrics, MetricsService, ReportingService};
use crate::AppState;

#[derive(Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// Today's activity and current stock
pub async fn get_metrics(State(state): State<AppState>) -> AppResult<Json<DashboardMetrics>> {
    let today = state.config.business.today();
    let service = MetricsService::new(state.store);
    let metrics = service.today_metrics(today).await?;
    Ok(Json(metrics))
}

/// Latest purchases, sales and expenses
pub async fn get_recent_transactions(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<Vec<RecentTransaction>>> {
    let service = ReportingService::new(state.store);
    let feed = service
        .recent_transactions(query.limit.unwrap_or(DEFAULT_RECENT_LIMIT))
        .await?;
    Ok(Json(feed))
}
