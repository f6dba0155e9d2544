//! Stock ledger and transaction log models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quantity on hand for one named item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockItem {
    pub name: String,
    pub quantity_kg: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// Whether a movement adds to or removes from stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            _ => None,
        }
    }

    /// Apply the direction's sign to an unsigned amount
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            Direction::In => amount,
            Direction::Out => -amount,
        }
    }
}

/// Kind of business event that caused a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Purchase,
    Production,
    Sale,
    Drying,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Purchase => "purchase",
            SourceType::Production => "production",
            SourceType::Sale => "sale",
            SourceType::Drying => "drying",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "purchase" => Some(SourceType::Purchase),
            "production" => Some(SourceType::Production),
            "sale" => Some(SourceType::Sale),
            "drying" => Some(SourceType::Drying),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry in the append-only transaction log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockMovement {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub item_name: String,
    pub direction: Direction,
    /// Always positive; zero-quantity movements are never logged
    pub amount_kg: Decimal,
    pub quantity_before_kg: Decimal,
    pub quantity_after_kg: Decimal,
    pub source_type: SourceType,
    pub source_record_id: Uuid,
    pub note: Option<String>,
}

impl StockMovement {
    pub fn signed_amount(&self) -> Decimal {
        self.direction.signed(self.amount_kg)
    }
}

/// A movement ready to be appended to the log
#[derive(Debug, Clone, PartialEq)]
pub struct NewStockMovement {
    pub item_name: String,
    pub direction: Direction,
    pub amount_kg: Decimal,
    pub quantity_before_kg: Decimal,
    pub quantity_after_kg: Decimal,
    pub source_type: SourceType,
    pub source_record_id: Uuid,
    pub note: Option<String>,
}

/// Ledger vs. log comparison for a single item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconciliationLine {
    pub item_name: String,
    pub ledger_kg: Decimal,
    pub movement_sum_kg: Decimal,
    pub matches: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconciliationReport {
    pub items: Vec<ReconciliationLine>,
    pub balanced: bool,
}

impl ReconciliationReport {
    /// Compare ledger quantities against the signed sum of the log.
    /// Items present only in the log are reported with a zero ledger value.
    pub fn build(items: &[StockItem], movements: &[StockMovement]) -> Self {
        use std::collections::BTreeMap;

        let mut sums: BTreeMap<&str, Decimal> = BTreeMap::new();
        for movement in movements {
            let sum = sums.entry(movement.item_name.as_str()).or_default();
            *sum = sum.saturating_add(movement.signed_amount());
        }

        let mut ledger: BTreeMap<&str, Decimal> = BTreeMap::new();
        for item in items {
            ledger.insert(item.name.as_str(), item.quantity_kg);
            sums.entry(item.name.as_str()).or_default();
        }

        let lines: Vec<ReconciliationLine> = sums
            .into_iter()
            .map(|(name, movement_sum_kg)| {
                let ledger_kg = ledger.get(name).copied().unwrap_or_default();
                ReconciliationLine {
                    item_name: name.to_string(),
                    ledger_kg,
                    movement_sum_kg,
                    matches: ledger_kg == movement_sum_kg,
                }
            })
            .collect();

        let balanced = lines.iter().all(|l| l.matches);
        Self {
            items: lines,
            balanced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn movement(item: &str, direction: Direction, amount: Decimal) -> StockMovement {
        StockMovement {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            item_name: item.to_string(),
            direction,
            amount_kg: amount,
            quantity_before_kg: Decimal::ZERO,
            quantity_after_kg: Decimal::ZERO,
            source_type: SourceType::Purchase,
            source_record_id: Uuid::new_v4(),
            note: None,
        }
    }

    fn stock(name: &str, qty: Decimal) -> StockItem {
        StockItem {
            name: name.to_string(),
            quantity_kg: qty,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(movement("beras", Direction::In, dec!(10)).signed_amount(), dec!(10));
        assert_eq!(movement("beras", Direction::Out, dec!(10)).signed_amount(), dec!(-10));
    }

    #[test]
    fn test_reconciliation_balanced() {
        let items = vec![stock("gabah", dec!(200)), stock("beras", dec!(480))];
        let movements = vec![
            movement("gabah", Direction::In, dec!(1000)),
            movement("gabah", Direction::Out, dec!(800)),
            movement("beras", Direction::In, dec!(480)),
        ];

        let report = ReconciliationReport::build(&items, &movements);
        assert!(report.balanced);
        assert_eq!(report.items.len(), 2);
    }

    #[test]
    fn test_reconciliation_flags_drift() {
        let items = vec![stock("beras", dec!(100))];
        let movements = vec![
            movement("beras", Direction::In, dec!(90)),
            movement("katul", Direction::In, dec!(5)),
        ];

        let report = ReconciliationReport::build(&items, &movements);
        assert!(!report.balanced);

        let katul = report.items.iter().find(|l| l.item_name == "katul").unwrap();
        assert_eq!(katul.ledger_kg, Decimal::ZERO);
        assert!(!katul.matches);
    }
}
