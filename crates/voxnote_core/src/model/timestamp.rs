//! Serde adapter for human-readable record timestamps.
//!
//! Persisted files store instants as local wall-clock strings
//! (`2024-11-17 14:30:00`), matching what a person reading the JSON expects.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

/// Storage format for record timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Display format used when listing records back to the user.
pub const DISPLAY_FORMAT: &str = "%b %d, %I:%M %p";

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
}

/// Formats an instant for list responses (`Nov 17, 02:30 PM`).
pub fn display(value: &NaiveDateTime) -> String {
    value.format(DISPLAY_FORMAT).to_string()
}

/// Current local wall-clock instant, the reference `now` for live commands.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
