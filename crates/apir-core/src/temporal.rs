//! # Calendar Dates
//!
//! Removal deadlines and enforcement dates are plain `YYYY-MM-DD` dates with
//! no time zone. "Today" is always taken in UTC so that a build yields the
//! same verdict regardless of the machine's locale.

use chrono::{Days, NaiveDate, Utc};

use crate::error::ValidationError;

/// Format used by every date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    // chrono accepts unpadded fields; the wire format does not.
    if trimmed.len() != 10 {
        return Err(ValidationError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The current UTC calendar date.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// `date` shifted forward by `days`, saturating at the calendar's end.
pub fn days_after(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}
