//! Converts raw reading lines into debounced speed events
//!
//! The sensor emits a near-continuous stream of readings while a target
//! is in view; the debounce window collapses that chatter into one event
//! per pass. The window is measured from the previous emitted event, not
//! from every raw reading.

use crate::domain::event::{new_uuid_v7, now_rfc3339, SpeedEvent};
use crate::domain::types::Direction;
use std::time::Duration;
use tracing::trace;

/// Unit label stamped on every event
const UNITS: &str = "mph";

pub struct EventBuilder {
    debounce: Duration,
    include_direction: bool,
    /// Epoch ms of the last emitted event; None until the first emission
    last_emitted_ms: Option<u64>,
}

impl EventBuilder {
    /// A zero window disables debouncing
    pub fn new(debounce: Duration, include_direction: bool) -> Self {
        Self { debounce, include_direction, last_emitted_ms: None }
    }

    /// Build an event from one raw reading line, or None when the reading
    /// falls inside the debounce window.
    ///
    /// A line that does not parse as a number maps to a 0.0 reading; on
    /// the wire a parse failure is indistinguishable from a true zero.
    pub fn build(&mut self, raw: &str, now_ms: u64) -> Option<SpeedEvent> {
        let reading: f64 = raw.trim().parse().unwrap_or(0.0);

        let (magnitude, direction) = if reading < 0.0 {
            (-reading, Direction::Away)
        } else {
            (reading, Direction::Toward)
        };

        if let Some(last) = self.last_emitted_ms {
            if now_ms.saturating_sub(last) < self.debounce.as_millis() as u64 {
                trace!(raw = %raw, "reading_debounced");
                return None;
            }
        }

        self.last_emitted_ms = Some(now_ms);

        Some(SpeedEvent {
            kind: "speed",
            timestamp: now_rfc3339(),
            magnitude,
            direction: self.include_direction.then_some(direction),
            units: UNITS,
            id: new_uuid_v7(),
            raw: raw.to_string(),
        })
    }
}
