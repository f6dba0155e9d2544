//! Error handling for the PadiDoc backend
//!
//! Provides consistent error responses in English and Indonesian

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::ValidationError;
use thiserror::Error;

use crate::store::StoreError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_idn: String,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),

    // Business logic errors
    #[error("Insufficient stock of {item}: available {available}, requested {requested}")]
    InsufficientStock {
        item: String,
        available: Decimal,
        requested: Decimal,
    },

    // Storage errors
    #[error("Database error: {0}")]
    DatabaseError(StoreError),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation {
            field: err.field,
            message: err.message,
            message_idn: err.message_idn,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientStock {
                item,
                available,
                requested,
            } => AppError::InsufficientStock {
                item,
                available,
                requested,
            },
            StoreError::CapacityExceeded { item, max, .. } => AppError::Validation {
                message: format!("stock would exceed {} kg", max),
                message_idn: format!("stok akan melebihi {} kg", max),
                field: item,
            },
            other => AppError::DatabaseError(other),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(StoreError::Postgres(err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Internal(format!("CSV export failed: {}", err))
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_idn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation {
                field,
                message,
                message_idn,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: format!("{} {}", field, message),
                    message_idn: format!("{} {}", field, message_idn),
                    field: Some(field.clone()),
                    details: None,
                },
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "BAD_REQUEST".to_string(),
                    message_en: msg.clone(),
                    message_idn: format!("Permintaan tidak valid: {}", msg),
                    field: None,
                    details: None,
                },
            ),
            AppError::InsufficientStock {
                item,
                available,
                requested,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message_en: format!(
                        "Insufficient {} stock. Available: {} kg, requested: {} kg",
                        item, available, requested
                    ),
                    message_idn: format!(
                        "Stok {} tidak mencukupi. Stok saat ini: {} kg, dibutuhkan: {} kg",
                        item, available, requested
                    ),
                    field: None,
                    details: Some(serde_json::json!({
                        "item": item,
                        "available": available,
                        "requested": requested,
                        "shortfall": requested.saturating_sub(*available),
                    })),
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_idn: "Terjadi kesalahan pada database".to_string(),
                    field: None,
                    details: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_idn: "Terjadi kesalahan internal pada server".to_string(),
                    field: None,
                    details: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
