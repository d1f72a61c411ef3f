//! Lenient timestamp decoding for provider wire shapes.
//!
//! Providers disagree on how they send times: RFC 3339 strings with any
//! offset, Unix seconds (GitHub push payloads), `null`, or an empty string.
//! Wire structs use [`deserialize`] so an odd timestamp degrades to `None`
//! instead of failing the whole decode.
//!
//! ```
//! use chrono::{DateTime, Utc};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Wire {
//!     #[serde(default, deserialize_with = "scm_client::time::deserialize")]
//!     created_at: Option<DateTime<Utc>>,
//! }
//!
//! let wire: Wire = serde_json::from_str(r#"{"created_at": 1430869215}"#).unwrap();
//! assert_eq!(wire.created_at.unwrap().to_rfc3339(), "2015-05-05T23:40:15+00:00");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Deserializes an optional timestamp, mapping anything unreadable to `None`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at this position.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse))
}

/// Converts a JSON scalar into a UTC timestamp.
#[must_use]
pub fn parse(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        serde_json::Value::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Wire {
        #[serde(default, deserialize_with = "deserialize")]
        at: Option<DateTime<Utc>>,
    }

    fn decode(raw: &str) -> Option<DateTime<Utc>> {
        serde_json::from_str::<Wire>(raw).unwrap().at
    }

    #[test]
    fn rfc3339_with_offset_is_normalized_to_utc() {
        let at = decode(r#"{"at":"2015-05-05T19:40:15-04:00"}"#).unwrap();

        assert_eq!(at.to_rfc3339(), "2015-05-05T23:40:15+00:00");
    }

    #[test]
    fn unix_seconds_are_accepted() {
        let at = decode(r#"{"at":1430869215}"#).unwrap();

        assert_eq!(at.timestamp(), 1_430_869_215);
    }

    #[test]
    fn odd_values_become_none() {
        assert_eq!(decode(r#"{"at":null}"#), None);
        assert_eq!(decode(r#"{"at":""}"#), None);
        assert_eq!(decode(r#"{"at":"yesterday"}"#), None);
        assert_eq!(decode(r#"{"at":{"seconds":1}}"#), None);
        assert_eq!(decode("{}"), None);
    }

    #[test]
    fn parse_handles_scalars() {
        assert!(parse(&json!("2024-01-01T00:00:00Z")).is_some());
        assert!(parse(&json!(true)).is_none());
    }
}
