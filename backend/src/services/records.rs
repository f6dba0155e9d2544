//! Read access to stock-affecting business records

use std::sync::Arc;

use shared::{DateRange, Drying, Production, Purchase, Sale};

use crate::error::AppResult;
use crate::store::InventoryStore;

#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn InventoryStore>,
}

impl RecordService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    pub async fn list_purchases(&self, range: Option<DateRange>) -> AppResult<Vec<Purchase>> {
        Ok(self.store.purchases(range).await?)
    }

    pub async fn list_productions(&self, range: Option<DateRange>) -> AppResult<Vec<Production>> {
        Ok(self.store.productions(range).await?)
    }

    pub async fn list_sales(&self, range: Option<DateRange>) -> AppResult<Vec<Sale>> {
        Ok(self.store.sales(range).await?)
    }

    pub async fn list_dryings(&self, range: Option<DateRange>) -> AppResult<Vec<Drying>> {
        Ok(self.store.dryings(range).await?)
    }
}
