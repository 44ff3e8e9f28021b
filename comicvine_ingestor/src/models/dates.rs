//! Serde helpers that normalize ComicVine date payloads.
//!
//! The API is inconsistent about temporal fields: the same field may arrive
//! as a plain date (`2024-03-05`), a space-separated datetime
//! (`2024-03-05 12:34:56`), an RFC 3339 timestamp, an empty string, or null.
//! These deserializers collapse all of that into `Option<NaiveDate>` /
//! `Option<DateTime<Utc>>` at the adapter boundary, so downstream code never
//! has to probe raw strings. Timestamps without an explicit zone are treated
//! as UTC, which is what the API serves.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    None
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    None
}

/// Deserializes an optional calendar date from any of the formats the API
/// emits. Null and empty strings become `None`; an unrecognized format is a
/// payload error.
pub fn flexible_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => {
            let s = raw.trim();
            if s.is_empty() {
                return Ok(None);
            }
            parse_date(s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date: {raw:?}")))
        }
    }
}

/// Deserializes an optional UTC timestamp from any of the formats the API
/// emits. See [`flexible_date`].
pub fn flexible_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => {
            let s = raw.trim();
            if s.is_empty() {
                return Ok(None);
            }
            parse_datetime(s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("unrecognized datetime: {raw:?}")))
        }
    }
}

/// Deserializes `start_year`, which arrives as an integer, a numeric string,
/// an empty string, or occasionally junk like `"19??"`. Junk becomes `None`
/// rather than failing the whole record.
pub fn flexible_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Int(i32),
        Str(String),
    }

    match Option::<RawYear>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawYear::Int(y)) => Ok(Some(y)),
        Some(RawYear::Str(s)) => Ok(s.trim().parse().ok()),
    }
}
