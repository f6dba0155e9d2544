//! Business logic services for the PadiDoc backend

pub mod expense;
pub mod metrics;
pub mod movement;
pub mod records;
pub mod reporting;
pub mod stock;

pub use expense::ExpenseService;
pub use metrics::{DashboardMetrics, MetricsService};
pub use movement::MovementProcessor;
pub use records::RecordService;
pub use reporting::ReportingService;
pub use stock::StockService;
