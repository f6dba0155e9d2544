//! Milling runs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{item, GrainSource};

/// Input for recording a production run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduction {
    pub date: NaiveDate,
    #[serde(default)]
    pub rice_type: Option<String>,
    #[serde(default)]
    pub source: GrainSource,
    pub input_weight_kg: Decimal,
    #[serde(default)]
    pub rice_kg: Option<Decimal>,
    /// Katul / dedak
    #[serde(default)]
    pub bran_kg: Option<Decimal>,
    #[serde(default)]
    pub broken_kg: Option<Decimal>,
    /// Menir
    #[serde(default)]
    pub fines_kg: Option<Decimal>,
    /// Sekam
    #[serde(default)]
    pub husk_kg: Option<Decimal>,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewProduction {
    /// Output quantities keyed by the stock item they land in.
    /// Absent outputs count as zero.
    pub fn outputs(&self) -> [(&'static str, Decimal); 5] {
        [
            (item::BERAS, self.rice_kg.unwrap_or_default()),
            (item::KATUL, self.bran_kg.unwrap_or_default()),
            (item::BROKEN, self.broken_kg.unwrap_or_default()),
            (item::MENIR, self.fines_kg.unwrap_or_default()),
            (item::SEKAM, self.husk_kg.unwrap_or_default()),
        ]
    }

    pub fn total_output_kg(&self) -> Decimal {
        self.outputs()
            .iter()
            .fold(Decimal::ZERO, |total, (_, kg)| total.saturating_add(*kg))
    }

    pub fn rendemen(&self) -> Decimal {
        rendemen(self.rice_kg.unwrap_or_default(), self.input_weight_kg)
    }
}

/// Milled rice yield as a percentage of grain input, rounded to 2 places
pub fn rendemen(rice_kg: Decimal, input_weight_kg: Decimal) -> Decimal {
    if input_weight_kg.is_zero() {
        return Decimal::ZERO;
    }
    rice_kg
        .checked_div(input_weight_kg)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp(2))
        .unwrap_or(Decimal::MAX)
}

/// A recorded production run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Production {
    pub id: Uuid,
    pub date: NaiveDate,
    pub rice_type: Option<String>,
    pub source: GrainSource,
    pub input_weight_kg: Decimal,
    pub rice_kg: Option<Decimal>,
    pub bran_kg: Option<Decimal>,
    pub broken_kg: Option<Decimal>,
    pub fines_kg: Option<Decimal>,
    pub husk_kg: Option<Decimal>,
    pub rendemen: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Production {
    pub fn from_new(id: Uuid, input: NewProduction, created_at: DateTime<Utc>) -> Self {
        let rendemen = input.rendemen();
        Self {
            id,
            date: input.date,
            rice_type: input.rice_type,
            source: input.source,
            input_weight_kg: input.input_weight_kg,
            rice_kg: input.rice_kg,
            bran_kg: input.bran_kg,
            broken_kg: input.broken_kg,
            fines_kg: input.fines_kg,
            husk_kg: input.husk_kg,
            rendemen,
            note: input.note,
            created_at,
        }
    }

    pub fn rice_output_kg(&self) -> Decimal {
        self.rice_kg.unwrap_or_default()
    }
}
