//! IO modules - external system interfaces
//!
//! This module contains all external IO operations:
//! - `serial` - sensor transport and response framing
//! - `sensor` - OPS243 command set and init handshake
//! - `mqtt_egress` - MQTT publisher for speed events

pub mod mqtt_egress;
pub mod sensor;
pub mod serial;

// Re-export commonly used types
pub use mqtt_egress::{EventPublisher, EventSink};
pub use serial::SensorLink;
