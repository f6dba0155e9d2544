//! Product kinds and stock item naming
//!
//! Every stock item is keyed by a plain name. Business records carry typed
//! product information that resolves to one of these names.

use serde::{Deserialize, Serialize};

/// Stock item names
pub mod item {
    pub const GABAH: &str = "gabah";
    pub const GABAH_BASAH: &str = "gabah_basah";
    pub const GABAH_KERING: &str = "gabah_kering";
    pub const PK: &str = "pk";
    pub const BERAS: &str = "beras";
    pub const KATUL: &str = "katul";
    pub const MENIR: &str = "menir";
    pub const BROKEN: &str = "broken";
    pub const SEKAM: &str = "sekam";

    /// All grain items, summed for the dashboard grain figure
    pub const GRAIN_ITEMS: &[&str] = &[GABAH, GABAH_BASAH, GABAH_KERING];
}

/// Kinds of product bought or sold by the mill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Gabah,
    Pk,
    #[default]
    Beras,
    /// Bran, also called dedak
    #[serde(alias = "dedak")]
    Katul,
    Menir,
    Broken,
    Sekam,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Gabah => "gabah",
            ProductKind::Pk => "pk",
            ProductKind::Beras => "beras",
            ProductKind::Katul => "katul",
            ProductKind::Menir => "menir",
            ProductKind::Broken => "broken",
            ProductKind::Sekam => "sekam",
        }
    }

    /// Stock item this product is booked against.
    /// Moisture status only distinguishes grain.
    pub fn stock_item(&self, status: Option<GrainStatus>) -> &'static str {
        match (self, status) {
            (ProductKind::Gabah, Some(GrainStatus::Basah)) => item::GABAH_BASAH,
            (ProductKind::Gabah, Some(GrainStatus::Kering)) => item::GABAH_KERING,
            (ProductKind::Gabah, None) => item::GABAH,
            (ProductKind::Pk, _) => item::PK,
            (ProductKind::Beras, _) => item::BERAS,
            (ProductKind::Katul, _) => item::KATUL,
            (ProductKind::Menir, _) => item::MENIR,
            (ProductKind::Broken, _) => item::BROKEN,
            (ProductKind::Sekam, _) => item::SEKAM,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gabah" => Some(ProductKind::Gabah),
            "pk" => Some(ProductKind::Pk),
            "beras" => Some(ProductKind::Beras),
            "katul" | "dedak" => Some(ProductKind::Katul),
            "menir" => Some(ProductKind::Menir),
            "broken" => Some(ProductKind::Broken),
            "sekam" => Some(ProductKind::Sekam),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moisture state of purchased grain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrainStatus {
    /// Wet, straight from the field
    Basah,
    /// Dried
    Kering,
}

impl GrainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrainStatus::Basah => "basah",
            GrainStatus::Kering => "kering",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basah" => Some(GrainStatus::Basah),
            "kering" => Some(GrainStatus::Kering),
            _ => None,
        }
    }
}

/// Material fed into the mill for a production run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GrainSource {
    #[default]
    Gabah,
    GabahBasah,
    GabahKering,
    Pk,
}

impl GrainSource {
    pub fn as_str(&self) -> &'static str {
        self.stock_item()
    }

    pub fn stock_item(&self) -> &'static str {
        match self {
            GrainSource::Gabah => item::GABAH,
            GrainSource::GabahBasah => item::GABAH_BASAH,
            GrainSource::GabahKering => item::GABAH_KERING,
            GrainSource::Pk => item::PK,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gabah" => Some(GrainSource::Gabah),
            "gabah_basah" => Some(GrainSource::GabahBasah),
            "gabah_kering" => Some(GrainSource::GabahKering),
            "pk" => Some(GrainSource::Pk),
            _ => None,
        }
    }
}
