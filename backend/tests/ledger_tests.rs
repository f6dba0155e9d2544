//! Stock ledger tests
//!
//! Tests for the movement processor over the in-memory store including:
//! - The purchase -> milling -> sale walkthrough
//! - Oversell rejection with no side effects
//! - Atomic failure of multi-item events
//! - Zero quantities never reaching the log
//! - Ledger/log reconciliation over random event sequences

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use padidoc_backend::error::AppError;
use padidoc_backend::services::{MetricsService, MovementProcessor, StockService};
use padidoc_backend::store::{InventoryStore, MemoryStore, MovementFilter};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    Direction, DryingMethod, GrainSource, GrainStatus, NewDrying, NewProduction, NewPurchase,
    NewSale, PaymentStatus, ProductKind, SourceType,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 16).unwrap()
}

fn setup() -> (MovementProcessor, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (MovementProcessor::new(store.clone()), store)
}

fn grain_purchase(weight: &str, price: &str, status: Option<GrainStatus>) -> NewPurchase {
    NewPurchase {
        date: today(),
        supplier: "Pak Budi".to_string(),
        product_kind: ProductKind::Gabah,
        status,
        weight_kg: dec(weight),
        unit_price: dec(price),
        note: None,
    }
}

fn milling(input: &str, rice: &str) -> NewProduction {
    NewProduction {
        date: today(),
        rice_type: Some("IR64".to_string()),
        source: GrainSource::Gabah,
        input_weight_kg: dec(input),
        rice_kg: Some(dec(rice)),
        bran_kg: None,
        broken_kg: None,
        fines_kg: None,
        husk_kg: None,
        note: None,
    }
}

fn rice_sale(quantity: &str, price: &str) -> NewSale {
    NewSale {
        date: today(),
        buyer: "Toko Sari".to_string(),
        product_kind: ProductKind::Beras,
        quantity_kg: dec(quantity),
        unit_price: dec(price),
        payment_status: PaymentStatus::Paid,
        due_date: None,
        settled_date: None,
        note: None,
    }
}

async fn log_len(store: &MemoryStore) -> usize {
    store.movements(MovementFilter::default()).await.unwrap().len()
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[cfg(test)]
mod scenario_tests {
    use super::*;

    /// Purchase, mill and sell, then try to oversell
    #[tokio::test]
    async fn test_purchase_mill_sell_walkthrough() {
        let (processor, store) = setup();
        assert_eq!(store.stock_quantity("gabah").await.unwrap(), Decimal::ZERO);

        let purchase = processor
            .create_purchase(grain_purchase("1000", "8000", None))
            .await
            .unwrap();
        assert_eq!(purchase.total_price, dec("8000000"));
        assert_eq!(store.stock_quantity("gabah").await.unwrap(), dec("1000"));

        let production = processor
            .create_production(milling("800", "480"))
            .await
            .unwrap();
        assert_eq!(production.rendemen, dec("60"));
        assert_eq!(store.stock_quantity("gabah").await.unwrap(), dec("200"));
        assert_eq!(store.stock_quantity("beras").await.unwrap(), dec("480"));

        let sale = processor
            .create_sale(rice_sale("300", "15000"))
            .await
            .unwrap();
        assert_eq!(sale.total_price, dec("4500000"));
        assert_eq!(store.stock_quantity("beras").await.unwrap(), dec("180"));

        let err = processor
            .create_sale(rice_sale("50000", "15000"))
            .await
            .unwrap_err();
        match err {
            AppError::InsufficientStock {
                item,
                available,
                requested,
            } => {
                assert_eq!(item, "beras");
                assert_eq!(available, dec("180"));
                assert_eq!(requested, dec("50000"));
            }
            other => panic!("expected insufficient stock, got {:?}", other),
        }
        assert_eq!(store.stock_quantity("beras").await.unwrap(), dec("180"));

        let report = StockService::new(store.clone())
            .reconciliation()
            .await
            .unwrap();
        assert!(report.balanced);
    }

    /// Each event's movements reference its record
    #[tokio::test]
    async fn test_movements_reference_source_record() {
        let (processor, store) = setup();
        processor
            .create_purchase(grain_purchase("1000", "8000", None))
            .await
            .unwrap();
        let production = processor
            .create_production(milling("800", "480"))
            .await
            .unwrap();

        let log = store.movements(MovementFilter::default()).await.unwrap();
        let from_production: Vec<_> = log
            .iter()
            .filter(|m| m.source_record_id == production.id)
            .collect();

        assert_eq!(from_production.len(), 2);
        assert!(from_production
            .iter()
            .all(|m| m.source_type == SourceType::Production));
        assert!(from_production
            .iter()
            .any(|m| m.item_name == "gabah" && m.direction == Direction::Out));
    }

    #[tokio::test]
    async fn test_drying_moves_wet_grain_to_dry() {
        let (processor, store) = setup();
        processor
            .create_purchase(grain_purchase("1000", "7000", Some(GrainStatus::Basah)))
            .await
            .unwrap();

        let drying = processor
            .create_drying(NewDrying {
                date: today(),
                initial_weight_kg: Some(dec("1000")),
                dried_weight_kg: Some(dec("860")),
                method: DryingMethod::Rented,
                cost: dec("150000"),
                note: None,
            })
            .await
            .unwrap();

        assert_eq!(drying.weight_loss_kg, dec("140"));
        assert_eq!(store.stock_quantity("gabah_basah").await.unwrap(), Decimal::ZERO);
        assert_eq!(store.stock_quantity("gabah_kering").await.unwrap(), dec("860"));
    }

    #[tokio::test]
    async fn test_dashboard_metrics_after_walkthrough() {
        let (processor, store) = setup();
        processor
            .create_purchase(grain_purchase("1000", "8000", None))
            .await
            .unwrap();
        processor
            .create_purchase(grain_purchase("500", "7000", Some(GrainStatus::Kering)))
            .await
            .unwrap();
        processor
            .create_production(milling("800", "480"))
            .await
            .unwrap();
        processor
            .create_sale(rice_sale("300", "15000"))
            .await
            .unwrap();

        let metrics = MetricsService::new(store.clone())
            .today_metrics(today())
            .await
            .unwrap();

        assert_eq!(metrics.purchases_count, 2);
        assert_eq!(metrics.production_count, 1);
        assert_eq!(metrics.sales_count, 1);
        assert_eq!(metrics.purchases_kg, dec("1500"));
        assert_eq!(metrics.production_rice_kg, dec("480"));
        assert_eq!(metrics.stock_rice, dec("180"));
        // 200 unspecified grain + 500 dry grain
        assert_eq!(metrics.stock_gabah, dec("700"));

        let tomorrow = today().succ_opt().unwrap();
        let next_day = MetricsService::new(store)
            .today_metrics(tomorrow)
            .await
            .unwrap();
        assert_eq!(next_day.purchases_count, 0);
        assert_eq!(next_day.stock_rice, dec("180"));
    }
}

// ============================================================================
// Failure Tests
// ============================================================================

#[cfg(test)]
mod failure_tests {
    use super::*;

    /// A rejected sale leaves records, ledger and log untouched
    #[tokio::test]
    async fn test_oversell_has_no_side_effects() {
        let (processor, store) = setup();
        processor
            .create_purchase(NewPurchase {
                product_kind: ProductKind::Beras,
                ..grain_purchase("100", "12000", None)
            })
            .await
            .unwrap();
        let movements_before = log_len(&store).await;

        let result = processor.create_sale(rice_sale("100.001", "15000")).await;
        assert!(matches!(result, Err(AppError::InsufficientStock { .. })));

        assert!(store.sales(None).await.unwrap().is_empty());
        assert_eq!(store.stock_quantity("beras").await.unwrap(), dec("100"));
        assert_eq!(log_len(&store).await, movements_before);
    }

    /// Milling more grain than is on hand writes nothing at all
    #[tokio::test]
    async fn test_production_failure_is_atomic() {
        let (processor, store) = setup();
        processor
            .create_purchase(grain_purchase("100", "8000", None))
            .await
            .unwrap();

        let result = processor.create_production(milling("800", "480")).await;
        assert!(matches!(result, Err(AppError::InsufficientStock { ref item, .. }) if item == "gabah"));

        assert!(store.productions(None).await.unwrap().is_empty());
        assert_eq!(store.stock_quantity("gabah").await.unwrap(), dec("100"));
        assert_eq!(store.stock_quantity("beras").await.unwrap(), Decimal::ZERO);
        assert_eq!(log_len(&store).await, 1);
    }

    /// Drying is checked against wet grain only
    #[tokio::test]
    async fn test_drying_without_wet_grain_rejected() {
        let (processor, store) = setup();
        processor
            .create_purchase(grain_purchase("1000", "8000", Some(GrainStatus::Kering)))
            .await
            .unwrap();

        let result = processor
            .create_drying(NewDrying {
                date: today(),
                initial_weight_kg: Some(dec("100")),
                dried_weight_kg: Some(dec("85")),
                method: DryingMethod::OwnEquipment,
                cost: Decimal::ZERO,
                note: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::InsufficientStock { ref item, .. }) if item == "gabah_basah"));
        assert_eq!(store.stock_quantity("gabah_kering").await.unwrap(), dec("1000"));
    }

    #[tokio::test]
    async fn test_invalid_sale_dates_rejected_before_stock_check() {
        let (processor, store) = setup();
        let mut sale = rice_sale("10", "15000");
        sale.due_date = Some(today().pred_opt().unwrap());

        let result = processor.create_sale(sale).await;
        assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "due_date"));
        assert_eq!(log_len(&store).await, 0);
    }
}

// ============================================================================
// Zero Quantity Tests
// ============================================================================

#[cfg(test)]
mod zero_quantity_tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_purchase_recorded_without_movement() {
        let (processor, store) = setup();
        let purchase = processor
            .create_purchase(grain_purchase("0", "8000", None))
            .await
            .unwrap();

        assert_eq!(purchase.total_price, Decimal::ZERO);
        assert_eq!(store.purchases(None).await.unwrap().len(), 1);
        assert_eq!(log_len(&store).await, 0);
    }

    #[tokio::test]
    async fn test_zero_outputs_skipped() {
        let (processor, store) = setup();
        processor
            .create_purchase(grain_purchase("1000", "8000", None))
            .await
            .unwrap();

        let mut run = milling("800", "480");
        run.bran_kg = Some(Decimal::ZERO);
        run.husk_kg = Some(dec("160"));
        processor.create_production(run).await.unwrap();

        let log = store.movements(MovementFilter::default()).await.unwrap();
        assert!(log.iter().all(|m| m.amount_kg > Decimal::ZERO));
        assert!(log.iter().all(|m| m.item_name != "katul"));
        assert_eq!(store.stock_quantity("sekam").await.unwrap(), dec("160"));
    }

    #[tokio::test]
    async fn test_zero_sale_on_empty_stock_succeeds() {
        let (processor, store) = setup();
        let sale = processor.create_sale(rice_sale("0", "15000")).await.unwrap();

        assert_eq!(sale.total_price, Decimal::ZERO);
        assert_eq!(log_len(&store).await, 0);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[derive(Debug, Clone)]
enum Event {
    BuyGrain(u32),
    BuyWetGrain(u32),
    /// Input kg and rice yield percentage
    Mill(u32, u32),
    SellRice(u32),
    /// Initial kg and loss percentage
    Dry(u32, u32),
}

fn event_strategy() -> impl Strategy<Value = Event> {
    prop_oneof![
        (1u32..2000).prop_map(Event::BuyGrain),
        (1u32..2000).prop_map(Event::BuyWetGrain),
        (0u32..1500, 40u32..75).prop_map(|(input, pct)| Event::Mill(input, pct)),
        (0u32..800).prop_map(Event::SellRice),
        (0u32..1500, 5u32..25).prop_map(|(initial, pct)| Event::Dry(initial, pct)),
    ]
}

async fn apply(processor: &MovementProcessor, event: &Event) -> Result<(), AppError> {
    match *event {
        Event::BuyGrain(kg) => processor
            .create_purchase(grain_purchase(&kg.to_string(), "8000", None))
            .await
            .map(|_| ()),
        Event::BuyWetGrain(kg) => processor
            .create_purchase(grain_purchase(&kg.to_string(), "7000", Some(GrainStatus::Basah)))
            .await
            .map(|_| ()),
        Event::Mill(input, pct) => {
            let rice = Decimal::from(input) * Decimal::from(pct) / Decimal::from(100);
            processor
                .create_production(milling(&input.to_string(), &rice.to_string()))
                .await
                .map(|_| ())
        }
        Event::SellRice(kg) => processor
            .create_sale(rice_sale(&kg.to_string(), "15000"))
            .await
            .map(|_| ()),
        Event::Dry(initial, pct) => {
            let dried = Decimal::from(initial) * Decimal::from(100 - pct) / Decimal::from(100);
            processor
                .create_drying(NewDrying {
                    date: today(),
                    initial_weight_kg: Some(Decimal::from(initial)),
                    dried_weight_kg: Some(dried),
                    method: DryingMethod::OwnEquipment,
                    cost: Decimal::ZERO,
                    note: None,
                })
                .await
                .map(|_| ())
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Ledger equals the signed sum of the log after any event sequence,
    /// and no item ever goes negative
    #[test]
    fn prop_ledger_reconciles(events in prop::collection::vec(event_strategy(), 1..30)) {
        tokio_test::block_on(async {
            let (processor, store) = setup();
            for event in &events {
                match apply(&processor, event).await {
                    Ok(()) | Err(AppError::InsufficientStock { .. }) => {}
                    Err(other) => panic!("unexpected error for {:?}: {:?}", event, other),
                }
            }

            let report = StockService::new(store.clone()).reconciliation().await.unwrap();
            assert!(report.balanced, "unbalanced ledger: {:?}", report.items);

            for item in store.stock_items().await.unwrap() {
                assert!(item.quantity_kg >= Decimal::ZERO, "{} went negative", item.name);
            }
        });
    }

    /// Purchases always succeed and their totals are exact
    #[test]
    fn prop_purchase_total_exact(weight in 0u32..100_000, cents in 0u32..2_000_000) {
        let price = Decimal::new(i64::from(cents), 2);
        tokio_test::block_on(async {
            let (processor, store) = setup();
            let purchase = processor
                .create_purchase(grain_purchase(&weight.to_string(), &price.to_string(), None))
                .await
                .unwrap();

            assert_eq!(purchase.total_price, Decimal::from(weight) * price);
            assert_eq!(store.stock_quantity("gabah").await.unwrap(), Decimal::from(weight));
        });
    }

    /// A sale succeeds exactly when stock covers it
    #[test]
    fn prop_sale_never_oversells(stock in 0u32..5000, quantity in 0u32..5000) {
        tokio_test::block_on(async {
            let (processor, store) = setup();
            processor
                .create_purchase(NewPurchase {
                    product_kind: ProductKind::Beras,
                    ..grain_purchase(&stock.to_string(), "12000", None)
                })
                .await
                .unwrap();

            let result = processor.create_sale(rice_sale(&quantity.to_string(), "15000")).await;
            let remaining = store.stock_quantity("beras").await.unwrap();

            if quantity <= stock {
                assert!(result.is_ok());
                assert_eq!(remaining, Decimal::from(stock - quantity));
            } else {
                assert!(matches!(result, Err(AppError::InsufficientStock { .. })));
                assert_eq!(remaining, Decimal::from(stock));
            }
        });
    }
}
