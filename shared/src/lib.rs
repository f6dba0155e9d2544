//! Shared types and models for the PadiDoc rice mill platform
//!
//! This crate contains the domain records, movement planning and validation
//! shared between the backend, the frontend (via WASM), and tests.

pub mod cash_flow;
pub mod models;
pub mod movement;
pub mod types;
pub mod validation;

pub use cash_flow::*;
pub use models::*;
pub use movement::*;
pub use types::*;
pub use validation::*;
