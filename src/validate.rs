use chrono::{NaiveDate, NaiveTime};

use crate::error::StoreError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Validate a task name: must contain something besides whitespace.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::Invalid("task name must not be empty".into()));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn validate_date(date: &str) -> Result<NaiveDate, StoreError> {
    // chrono accepts single-digit fields; the stored form must be zero padded
    // so that lexical range queries stay correct.
    if date.len() != 10 {
        return Err(invalid_date(date));
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| invalid_date(date))
}

fn invalid_date(date: &str) -> StoreError {
    StoreError::Invalid(format!("invalid date '{date}': expected YYYY-MM-DD"))
}

/// Parse a 24-hour `HH:MM` clock time.
pub fn validate_clock_time(time: &str) -> Result<NaiveTime, StoreError> {
    if time.len() != 5 {
        return Err(invalid_time(time));
    }
    NaiveTime::parse_from_str(time, TIME_FORMAT).map_err(|_| invalid_time(time))
}

fn invalid_time(time: &str) -> StoreError {
    StoreError::Invalid(format!("invalid time '{time}': expected HH:MM (24-hour)"))
}
