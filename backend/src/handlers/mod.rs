//! HTTP handlers for the PadiDoc API

mod dashboard;
mod drying;
mod expense;
mod health;
mod production;
mod purchase;
pub mod query;
mod report;
mod sale;
mod stock;

pub use dashboard::*;
pub use drying::*;
pub use expense::*;
pub use health::*;
pub use production::*;
pub use purchase::*;
pub use report::*;
pub use sale::*;
pub use stock::*;
