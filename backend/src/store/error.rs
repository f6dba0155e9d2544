//! Error types for the storage layer

use rust_decimal::Decimal;

/// Errors raised while reading or writing the ledger and records
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Applying a delta would drive an item below zero
    #[error("insufficient stock of {item}: available {available} kg, requested {requested} kg")]
    InsufficientStock {
        item: String,
        available: Decimal,
        requested: Decimal,
    },

    /// Applying a delta would push an item past the largest storable quantity
    #[error("{item} would exceed {max} kg: current {current} kg, delta {delta} kg")]
    CapacityExceeded {
        item: String,
        current: Decimal,
        delta: Decimal,
        max: Decimal,
    },

    /// A `PostgreSQL` operation failed
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored value could not be mapped back to a domain type
    #[error("corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },

    /// Write used an item that was not locked in this transaction
    #[error("item {0} was not locked before writing")]
    NotLocked(String),

    /// Any other backend failure
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
