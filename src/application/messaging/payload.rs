//! Gateway message payloads and timestamp parsing

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::application::errors::MessageError;
use crate::domain::entities::User;

/// Raw message payload as delivered by create, update and edit events.
///
/// The resolved channel is not part of the wire format; callers pass it
/// alongside the payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MessagePayload {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tts: bool,
    #[serde(default)]
    pub nonce: Option<serde_json::Value>,
    pub timestamp: String,
    #[serde(default)]
    pub edited_timestamp: Option<String>,
    #[serde(default)]
    pub mention_everyone: bool,
    #[serde(default)]
    pub embeds: Vec<serde_json::Value>,
    #[serde(default)]
    pub attachments: Vec<serde_json::Value>,
    #[serde(default)]
    pub author: User,
    #[serde(default)]
    pub mentions: Vec<User>,
    #[serde(default)]
    pub mention_roles: Vec<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
}

impl MessagePayload {
    pub fn from_value(value: serde_json::Value) -> Result<Self, MessageError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json(text: &str) -> Result<Self, MessageError> {
        Ok(serde_json::from_str(text)?)
    }
}

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse a gateway timestamp into a naive UTC datetime.
///
/// Accepts `2015-08-21T12:03:45.782000+00:00` style values with or without
/// the fractional part, as well as the same shape without an offset.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<NaiveDateTime, MessageError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_utc());
    }

    NaiveDateTime::parse_from_str(value, NAIVE_FORMAT).map_err(|source| MessageError::Timestamp {
        field,
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_parse_timestamp_with_fraction() {
        let parsed = parse_timestamp("timestamp", "2015-08-21T12:03:45.782000+00:00").unwrap();
        let expected = NaiveDate::from_ymd_opt(2015, 8, 21)
            .unwrap()
            .and_hms_micro_opt(12, 3, 45, 782_000)
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_timestamp_without_fraction() {
        let parsed = parse_timestamp("timestamp", "2015-08-21T12:03:45+00:00").unwrap();
        assert_eq!(parsed.second(), 45);
        assert_eq!(parsed.nanosecond(), 0);
    }

    #[test]
    fn test_parse_timestamp_converts_offset_to_utc() {
        let parsed = parse_timestamp("timestamp", "2015-08-21T14:03:45+02:00").unwrap();
        assert_eq!(parsed.hour(), 12);
    }

    #[test]
    fn test_parse_timestamp_without_offset() {
        let parsed = parse_timestamp("timestamp", "2015-08-21T12:03:45.5").unwrap();
        assert_eq!(parsed.nanosecond(), 500_000_000);

        let parsed = parse_timestamp("timestamp", "2015-08-21T12:03:45").unwrap();
        assert_eq!(parsed.minute(), 3);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("edited_timestamp", "yesterday").unwrap_err();
        assert!(matches!(err, MessageError::Timestamp { field: "edited_timestamp", .. }));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_payload_defaults() {
        let payload = MessagePayload::from_json(
            r#"{"id": "1", "timestamp": "2016-01-01T00:00:00+00:00"}"#,
        )
        .unwrap();

        assert_eq!(payload.content, "");
        assert!(!payload.tts);
        assert!(payload.nonce.is_none());
        assert!(payload.edited_timestamp.is_none());
        assert!(payload.embeds.is_empty());
        assert!(payload.mentions.is_empty());
        assert_eq!(payload.author, User::default());
    }

    #[test]
    fn test_payload_null_edited_timestamp() {
        let payload = MessagePayload::from_value(serde_json::json!({
            "id": "1",
            "timestamp": "2016-01-01T00:00:00+00:00",
            "edited_timestamp": null,
            "nonce": "abc"
        }))
        .unwrap();

        assert!(payload.edited_timestamp.is_none());
        assert_eq!(payload.nonce, Some(serde_json::json!("abc")));
    }
}
