use chrono::{NaiveDateTime, Timelike};
use thiserror::Error;

/// Rejected timestamp text from a form field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised time \"{input}\" (expected YYYY-MM-DD HH:MM)")]
pub struct FormatError {
    pub input: String,
}

const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Format a second count as `HH:MM:SS`
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Format a timestamp as `DD/MM/YYYY, HH:MM:SS`
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%d/%m/%Y, %H:%M:%S").to_string()
}

pub fn format_time_range(start: &NaiveDateTime, end: &NaiveDateTime) -> String {
    format!("{} - {}", format_timestamp(start), format_timestamp(end))
}

/// Timestamp in the form an input field expects it back. Seconds are
/// only shown when set.
pub fn format_timestamp_input(ts: &NaiveDateTime) -> String {
    if ts.second() != 0 {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Parse a user-typed timestamp; blank input means "no time"
pub fn parse_timestamp_input(input: &str) -> Result<Option<NaiveDateTime>, FormatError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(Some)
        .ok_or_else(|| FormatError {
            input: trimmed.to_string(),
        })
}
