//! Reporting service: activity feed, cash flow and CSV export

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{cash_flow_report, merge_recent, CashFlowReport, DateRange, RecentTransaction};

use crate::error::{AppError, AppResult};
use crate::store::InventoryStore;

/// Feed length when the caller does not ask for one
pub const DEFAULT_RECENT_LIMIT: usize = 20;

#[derive(Clone)]
pub struct ReportingService {
    store: Arc<dyn InventoryStore>,
}

impl ReportingService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Purchases, sales and expenses merged, newest first
    pub async fn recent_transactions(&self, limit: usize) -> AppResult<Vec<RecentTransaction>> {
        let purchases = self.store.purchases(None).await?;
        let sales = self.store.sales(None).await?;
        let expenses = self.store.expenses(None).await?;
        Ok(merge_recent(&purchases, &sales, &expenses, limit))
    }

    /// Weekly summary and daily series for the week ending at `today`
    pub async fn cash_flow(
        &self,
        today: NaiveDate,
        opening_capital: Decimal,
    ) -> AppResult<CashFlowReport> {
        let window = Some(DateRange::trailing_days(today, shared::CASH_FLOW_WINDOW_DAYS));
        let sales = self.store.sales(window).await?;
        let purchases = self.store.purchases(window).await?;
        let expenses = self.store.expenses(window).await?;
        Ok(cash_flow_report(
            today,
            opening_capital,
            &sales,
            &purchases,
            &expenses,
        ))
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}
