//! Fatal error taxonomy for the bridge
//!
//! Every variant is fatal: the runtime loop propagates it to main, which
//! logs and exits. No component retries or reconnects; the process
//! supervisor restarts the whole bridge after a fatal exit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Serial read/write failure, including a closed device stream
    #[error("serial I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port open failure
    #[error("serial port: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Malformed or missing field in a structured handshake response
    #[error("handshake: no `{field}` in device response `{response}`")]
    Handshake {
        field: &'static str,
        response: String,
    },

    /// MQTT publish failure
    #[error("publish: {0}")]
    Publish(#[from] rumqttc::ClientError),
}
