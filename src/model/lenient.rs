//! Forgiving field deserializers for documents written by older builds or
//! other tools.

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampRepr {
    Text(String),
    Millis(i64),
    Float(f64),
    Other(IgnoredAny),
}

/// Accept an RFC 3339 string, epoch milliseconds, or `null`.
///
/// A value that is none of these is dropped with a warning; the timestamp is
/// store bookkeeping and never worth rejecting a document over.
pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<TimestampRepr>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(TimestampRepr::Text(text)) => DateTime::parse_from_rfc3339(text.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| e.to_string()),
        Some(TimestampRepr::Millis(ms)) => {
            DateTime::from_timestamp_millis(ms).ok_or_else(|| format!("{} out of range", ms))
        }
        Some(TimestampRepr::Float(ms)) => DateTime::from_timestamp_millis(ms as i64)
            .ok_or_else(|| format!("{} out of range", ms)),
        Some(TimestampRepr::Other(_)) => Err("not a string or number".to_string()),
    };

    match parsed {
        Ok(dt) => Ok(Some(dt)),
        Err(reason) => {
            log::warn!("Ignoring unreadable lastModified: {}", reason);
            Ok(None)
        }
    }
}
