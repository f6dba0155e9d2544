//! Domain models for the PadiDoc rice mill platform

mod drying;
mod expense;
mod product;
mod production;
mod purchase;
mod record;
mod sale;
mod stock;

pub use drying::*;
pub use expense::*;
pub use product::*;
pub use production::*;
pub use purchase::*;
pub use record::*;
pub use sale::*;
pub use stock::*;
