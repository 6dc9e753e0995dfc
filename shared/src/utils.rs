// Text formats shared by the ledger file and the command line.
// Dates are ISO `YYYY-MM-DD`, timestamps `YYYY-MM-DD HH:MM:SS` in local time.

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", s, e))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| anyhow!("Failed to parse timestamp '{}': {}", s, e))
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time truncated to whole seconds, matching what the file can hold.
pub fn now_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a decimal cell. An empty cell reads as NaN rather than failing.
pub fn parse_decimal(s: &str) -> Result<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    trimmed
        .parse::<f64>()
        .map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))
}

/// Shortest text that parses back to the same value ("100", "12.5", "-3").
pub fn format_decimal(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}
