//! Speed event model published to the bus

use crate::domain::types::Direction;
use chrono::{Local, SecondsFormat};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Generate a new UUIDv7 (time-sortable)
pub fn new_uuid_v7() -> String {
    Uuid::now_v7().to_string()
}

/// Get current epoch milliseconds
#[inline]
pub fn epoch_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

/// Current wall-clock time as RFC3339 with timezone offset
pub fn now_rfc3339() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// One emitted speed detection.
///
/// Immutable once built; ownership transfers to the publisher for
/// serialization and transmission.
#[derive(Debug, Clone, Serialize)]
pub struct SpeedEvent {
    /// Event kind tag, always "speed"
    pub kind: &'static str,
    /// Wall-clock timestamp at emission (RFC3339 with offset)
    pub timestamp: String,
    /// Absolute speed reading; the sign lives in `direction`
    pub magnitude: f64,
    /// Travel direction; absent when the builder is configured without it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Unit label for `magnitude`
    pub units: &'static str,
    /// Globally unique event id
    pub id: String,
    /// Original reading text as received, for audit
    pub raw: String,
}

impl SpeedEvent {
    /// Serialize to the wire JSON payload
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(direction: Option<Direction>) -> SpeedEvent {
        SpeedEvent {
            kind: "speed",
            timestamp: now_rfc3339(),
            magnitude: 12.5,
            direction,
            units: "mph",
            id: new_uuid_v7(),
            raw: "12.5".to_string(),
        }
    }

    #[test]
    fn test_event_to_json() {
        let event = sample(Some(Direction::Away));
        let parsed: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();

        assert_eq!(parsed["kind"], "speed");
        assert_eq!(parsed["magnitude"], 12.5);
        assert_eq!(parsed["direction"], "away");
        assert_eq!(parsed["units"], "mph");
        assert_eq!(parsed["id"], event.id);
        assert_eq!(parsed["raw"], "12.5");
    }

    #[test]
    fn test_direction_omitted_when_absent() {
        let event = sample(None);
        let parsed: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();
        assert!(parsed.get("direction").is_none());
    }

    #[test]
    fn test_timestamp_is_rfc3339_with_offset() {
        let event = sample(Some(Direction::Toward));
        assert!(chrono::DateTime::parse_from_rfc3339(&event.timestamp).is_ok());
    }

    #[test]
    fn test_uuid_v7_generation() {
        let uuid1 = new_uuid_v7();
        let uuid2 = new_uuid_v7();

        assert_ne!(uuid1, uuid2);
        // UUIDv7 should be 36 chars with hyphens
        assert_eq!(uuid1.len(), 36);
    }
}
