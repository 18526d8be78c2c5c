//! MQTT publisher for speed events
//!
//! Publishes each emitted event as JSON on a single topic at QoS 0 -
//! fire-and-forget, no acknowledgment and no delivery guarantee, which is
//! all a one-way periodic feed needs.

use crate::domain::event::SpeedEvent;
use crate::error::BridgeError;
use crate::infra::config::Config;
use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outbound sink for speed events
#[async_trait]
pub trait EventSink {
    /// Publish one event; a failure is fatal to the bridge
    async fn publish(&self, event: &SpeedEvent) -> Result<(), BridgeError>;
}

/// MQTT publisher backed by the embedded broker
pub struct EventPublisher {
    client: AsyncClient,
    topic: String,
}

impl EventPublisher {
    /// Connect to the broker and spawn the network event loop
    pub fn new(config: &Config) -> Self {
        let client_id = format!("radar-bridge-{}", std::process::id());
        let mut mqttoptions = MqttOptions::new(client_id, config.mqtt_host(), config.mqtt_port());
        mqttoptions.set_keep_alive(Duration::from_secs(30));
        mqttoptions.set_clean_session(true);

        let (client, mut eventloop) = AsyncClient::new(mqttoptions, 16);

        // Spawn the eventloop handler
        tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!("mqtt_connected");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "mqtt_connection_error");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });

        Self { client, topic: config.topic().to_string() }
    }
}

#[async_trait]
impl EventSink for EventPublisher {
    async fn publish(&self, event: &SpeedEvent) -> Result<(), BridgeError> {
        let payload = event.to_json();
        self.client
            .publish(&self.topic, QoS::AtMostOnce, false, payload.into_bytes())
            .await?;
        debug!(topic = %self.topic, id = %event.id, "event_published");
        Ok(())
    }
}
