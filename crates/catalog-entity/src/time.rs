//! Timestamp parsing tolerant of the backend's formats.
//!
//! The catalog backend emits either RFC 3339 strings with an offset or bare
//! `yyyy-MM-ddTHH:mm:ss[.SSS]` local-date-time strings. Bare strings are
//! interpreted as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a backend timestamp string into a UTC instant.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc())
        })
}

/// Serde codec around [`parse_timestamp`].
///
/// Used as `#[serde(with = "time::flexible")]` on timestamp fields.
/// Serialization always emits RFC 3339 with millisecond precision.
pub mod flexible {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}
