//! Route definitions for the PadiDoc API

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Stock-affecting records
        .route(
            "/purchases",
            get(handlers::list_purchases).post(handlers::create_purchase),
        )
        .route(
            "/productions",
            get(handlers::list_productions).post(handlers::create_production),
        )
        .route("/sales", get(handlers::list_sales).post(handlers::create_sale))
        .route(
            "/dryings",
            get(handlers::list_dryings).post(handlers::create_drying),
        )
        // Expenses (no stock effect)
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .nest("/stock", stock_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/reports", report_routes())
}

/// Stock ledger and transaction log
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_stock))
        .route("/movements", get(handlers::list_movements))
        .route("/reconciliation", get(handlers::get_reconciliation))
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(handlers::get_metrics))
        .route("/transactions", get(handlers::get_recent_transactions))
}

fn report_routes() -> Router<AppState> {
    Router::new().route("/cash-flow", get(handlers::get_cash_flow))
}
