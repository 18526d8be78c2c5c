//! OPS243 command set and initialization handshake
//!
//! Commands are short plain-text tokens; the sensor answers each query or
//! configuration command with a one-line structured object.

use crate::domain::types::DeviceIdentity;
use crate::error::BridgeError;
use crate::io::serial::SensorLink;
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

/// Query part number
pub const PART_NUMBER: &str = "?P";
/// Query serial number
pub const SERIAL_NUMBER: &str = "?N";
/// Report speeds in miles per hour
pub const UNITS_MPH: &str = "US";

/// Report only speeds above the given threshold
pub fn speed_filter(min_speed: u32) -> String {
    format!("R>{}\r", min_speed)
}

#[derive(Debug, Deserialize)]
struct PartNumberResponse {
    #[serde(rename = "Product")]
    product: String,
}

#[derive(Debug, Deserialize)]
struct SerialNumberResponse {
    #[serde(rename = "SerialNumber")]
    serial_number: String,
}

#[derive(Debug, Deserialize)]
struct UnitsResponse {
    #[serde(rename = "Units")]
    units: String,
}

/// Run the fixed initialization handshake.
///
/// Reads the part number and serial number, switches the output units to
/// miles per hour, and applies the minimum-speed filter. A malformed
/// response to any of the three queries is fatal; there is no degraded
/// mode without a confirmed device identity.
pub async fn initialize<S>(
    link: &mut SensorLink<S>,
    min_speed: u32,
) -> Result<DeviceIdentity, BridgeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    link.send(PART_NUMBER).await?;
    let response = link.read_object().await?;
    info!(response = %response, "sensor_part_number");
    let part: PartNumberResponse = parse_response(&response, "Product")?;

    link.send(SERIAL_NUMBER).await?;
    let response = link.read_object().await?;
    info!(response = %response, "sensor_serial_number");
    let serial: SerialNumberResponse = parse_response(&response, "SerialNumber")?;

    info!("sensor_set_units_mph");
    link.send(UNITS_MPH).await?;
    let response = link.read_object().await?;
    let units: UnitsResponse = parse_response(&response, "Units")?;

    // Response is read but not validated; a device-side rejection of the
    // filter command is invisible here.
    link.send(&speed_filter(min_speed)).await?;
    let response = link.read_object().await?;
    debug!(response = %response, "sensor_speed_filter");

    Ok(DeviceIdentity {
        product: part.product,
        serial: serial.serial_number,
        units: units.units,
    })
}

fn parse_response<T>(response: &str, field: &'static str) -> Result<T, BridgeError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_str(response).map_err(|_| BridgeError::Handshake {
        field,
        response: response.trim().to_string(),
    })
}
