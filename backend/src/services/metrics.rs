//! Dashboard metrics: today's activity and current stock

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{item, DateRange};

use crate::error::AppResult;
use crate::store::InventoryStore;

/// Summary shown on the dashboard
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardMetrics {
    pub date: NaiveDate,
    pub purchases_count: usize,
    pub production_count: usize,
    pub sales_count: usize,
    pub purchases_kg: Decimal,
    pub production_rice_kg: Decimal,
    pub sales_kg: Decimal,
    /// Milled rice on hand
    pub stock_rice: Decimal,
    /// All grain on hand, wet, dry and unspecified
    pub stock_gabah: Decimal,
    pub stock_katul: Decimal,
    pub stock_menir: Decimal,
    pub stock_sekam: Decimal,
    pub stock_broken: Decimal,
}

#[derive(Clone)]
pub struct MetricsService {
    store: Arc<dyn InventoryStore>,
}

impl MetricsService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Metrics for `today`, a calendar day in the business time zone
    pub async fn today_metrics(&self, today: NaiveDate) -> AppResult<DashboardMetrics> {
        let day = Some(DateRange::day(today));
        let purchases = self.store.purchases(day).await?;
        let productions = self.store.productions(day).await?;
        let sales = self.store.sales(day).await?;

        let stock: BTreeMap<String, Decimal> = self
            .store
            .stock_items()
            .await?
            .into_iter()
            .map(|s| (s.name, s.quantity_kg))
            .collect();
        let on_hand = |name: &str| stock.get(name).copied().unwrap_or_default();

        Ok(DashboardMetrics {
            date: today,
            purchases_count: purchases.len(),
            production_count: productions.len(),
            sales_count: sales.len(),
            purchases_kg: purchases.iter().map(|p| p.weight_kg).sum(),
            production_rice_kg: productions.iter().map(|p| p.rice_output_kg()).sum(),
            sales_kg: sales.iter().map(|s| s.quantity_kg).sum(),
            stock_rice: on_hand(item::BERAS),
            stock_gabah: item::GRAIN_ITEMS.iter().map(|name| on_hand(*name)).sum(),
            stock_katul: on_hand(item::KATUL),
            stock_menir: on_hand(item::MENIR),
            stock_sekam: on_hand(item::SEKAM),
            stock_broken: on_hand(item::BROKEN),
        })
    }
}
