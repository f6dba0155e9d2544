//! Query string parameters shared by several endpoints

use chrono::NaiveDate;
use serde::Deserialize;
use shared::DateRange;

use crate::error::{AppError, AppResult};

/// Optional `start_date` / `end_date` filter (YYYY-MM-DD, inclusive)
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn parse_date(name: &str, value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").map_err(|_| {
                AppError::BadRequest(format!("{} must be a date in YYYY-MM-DD format", name))
            })
        })
        .transpose()
}

impl DateQuery {
    pub fn range(&self) -> AppResult<Option<DateRange>> {
        let start = parse_date("start_date", self.start_date.as_deref())?;
        let end = parse_date("end_date", self.end_date.as_deref())?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(AppError::BadRequest(
                    "start_date must not be after end_date".to_string(),
                ));
            }
        }
        Ok(DateRange::from_bounds(start, end))
    }
}

/// Response format for exportable endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

pub fn parse_format(value: Option<&str>) -> AppResult<Format> {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("json") => Ok(Format::Json),
        Some("csv") => Ok(Format::Csv),
        Some(other) => Err(AppError::BadRequest(format!(
            "unsupported format '{}', expected json or csv",
            other
        ))),
    }
}
