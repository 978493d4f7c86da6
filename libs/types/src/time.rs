//! Timestamp wire format helpers
//!
//! The engine tracks time as Unix microseconds (`i64`); the public boundary
//! speaks ISO-8601 UTC with microsecond precision and a trailing `Z`.

use chrono::{DateTime, SecondsFormat, Utc};

/// Render Unix microseconds as an ISO-8601 UTC string, e.g.
/// `2024-02-16T21:10:56.789000Z`.
pub fn format_micros(micros: i64) -> String {
    DateTime::<Utc>::from_timestamp_micros(micros)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Serde adapter: `i64` Unix microseconds <-> ISO-8601 UTC string.
pub mod iso_micros {
    use chrono::DateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(micros: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_micros(*micros))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let dt = DateTime::parse_from_rfc3339(&s).map_err(serde::de::Error::custom)?;
        Ok(dt.timestamp_micros())
    }
}
