//! Steady-state runtime loop: read line, build event, publish
//!
//! Runs after the init handshake and never terminates normally; the only
//! exits are a fatal error or an external kill.

use crate::domain::event::epoch_ms;
use crate::error::BridgeError;
use crate::io::mqtt_egress::EventSink;
use crate::io::serial::SensorLink;
use crate::services::event_builder::EventBuilder;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::info;

/// Run the pipeline until a fatal error.
///
/// Every reading is framed, debounced, and either published or dropped.
/// Serial and publish failures propagate out; the supervisor restarts
/// the whole process.
pub async fn run<S, P>(
    link: &mut SensorLink<S>,
    builder: &mut EventBuilder,
    sink: &P,
) -> Result<(), BridgeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    P: EventSink,
{
    loop {
        let raw = link.read_line().await?;
        let Some(event) = builder.build(&raw, epoch_ms()) else {
            continue;
        };
        sink.publish(&event).await?;
        info!(
            magnitude = %event.magnitude,
            direction = event.direction.map(|d| d.as_str()).unwrap_or("n/a"),
            id = %event.id,
            "event_sent"
        );
    }
}
