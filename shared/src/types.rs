//! Common types used across the platform

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive date range for queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range covering a single calendar day
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The `days` calendar days ending at (and including) `end`
    pub fn trailing_days(end: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.saturating_sub(1));
        Self {
            start: end - chrono::Duration::days(span),
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Build a range from optional bounds; a missing bound is open-ended
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (None, None) => None,
            (start, end) => Some(Self {
                start: start.unwrap_or(NaiveDate::MIN),
                end: end.unwrap_or(NaiveDate::MAX),
            }),
        }
    }
}

/// Matches an optional range: no range means everything matches
pub fn in_range(range: Option<&DateRange>, date: NaiveDate) -> bool {
    range.map_or(true, |r| r.contains(date))
}
