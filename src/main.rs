//! Radar speed bridge - Doppler serial sensor to MQTT events
//!
//! Module structure:
//! - `domain/` - Speed event and sensor identity types
//! - `io/` - External interfaces (serial, sensor handshake, MQTT egress)
//! - `services/` - Pipeline logic (event builder, runtime loop)
//! - `infra/` - Infrastructure (config, embedded broker)

use clap::Parser;
use radar_bridge::infra::Config;
use radar_bridge::io::{sensor, EventPublisher, SensorLink};
use radar_bridge::services::{bridge, EventBuilder};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Radar bridge - publishes Doppler speed readings as bus events
#[derive(Parser, Debug)]
#[command(name = "radar-bridge", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Default: INFO, use RUST_LOG=debug for raw response visibility
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!("radar-bridge starting");

    let args = Args::parse();
    let config = Config::load_from_path(&args.config);

    info!(
        config_file = %config.config_file(),
        serial_device = %config.serial_device(),
        serial_baud = %config.serial_baud(),
        topic = %config.topic(),
        debounce_secs = %config.debounce_secs(),
        min_speed = %config.min_speed(),
        "config_loaded"
    );

    // The embedded broker is the bound publish socket subscribers connect to
    radar_bridge::infra::broker::start_embedded_broker(&config);

    let publisher = EventPublisher::new(&config);

    let mut link = match SensorLink::open(config.serial_device(), config.serial_baud()) {
        Ok(link) => link,
        Err(e) => {
            error!(device = %config.serial_device(), error = %e, "serial_open_failed");
            std::process::exit(1);
        }
    };

    let identity = match sensor::initialize(&mut link, config.min_speed()).await {
        Ok(identity) => identity,
        Err(e) => {
            error!(error = %e, "sensor_init_failed");
            std::process::exit(1);
        }
    };
    info!(
        product = %identity.product,
        serial = %identity.serial,
        units = %identity.units,
        "sensor_ready"
    );

    let mut builder = EventBuilder::new(
        Duration::from_secs(config.debounce_secs()),
        config.include_direction(),
    );

    tokio::select! {
        result = bridge::run(&mut link, &mut builder, &publisher) => {
            if let Err(e) = result {
                error!(error = %e, "bridge_fatal");
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown_signal_received");
        }
    }

    info!("radar-bridge shutdown complete");
    Ok(())
}
