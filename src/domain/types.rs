//! Shared types for the radar bridge

use serde::Serialize;

/// Direction of travel relative to the sensor head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Toward,
    Away,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Toward => "toward",
            Direction::Away => "away",
        }
    }
}

/// Identity reported by the sensor during the init handshake.
///
/// Populated exactly once before steady state begins and never mutated
/// afterwards; only diagnostics and logging read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub product: String,
    pub serial: String,
    pub units: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_as_str() {
        assert_eq!(Direction::Toward.as_str(), "toward");
        assert_eq!(Direction::Away.as_str(), "away");
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Toward).unwrap(), "\"toward\"");
        assert_eq!(serde_json::to_string(&Direction::Away).unwrap(), "\"away\"");
    }
}
