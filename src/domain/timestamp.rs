//! Serde codec for optional local timestamps.
//!
//! Times are stored the way a `datetime-local` input produces them
//! (`2024-05-01T09:30`), with an empty string standing in for "no time".

use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

const MINUTES: &str = "%Y-%m-%dT%H:%M";
const SECONDS: &str = "%Y-%m-%dT%H:%M:%S";
const FRACTIONAL: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Render a timestamp in the shortest lossless form
pub fn encode(ts: &NaiveDateTime) -> String {
    let format = if ts.nanosecond() != 0 {
        FRACTIONAL
    } else if ts.second() != 0 {
        SECONDS
    } else {
        MINUTES
    };
    ts.format(format).to_string()
}

/// Parse a stored timestamp. Blank or unrecognised text yields `None`.
pub fn decode(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDateTime::parse_from_str(raw, FRACTIONAL)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, MINUTES))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Local).naive_local())
        })
}

pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_str(&encode(ts)),
        None => serializer.serialize_str(""),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(decode))
}
