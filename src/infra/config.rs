//! Configuration loading from TOML files
//!
//! Config file is selected via the --config command line argument,
//! falling back to config/dev.toml. A missing or unparseable file falls
//! back to defaults matching the reference deployment.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct SerialConfig {
    #[serde(default = "default_serial_device")]
    pub device: String,
    #[serde(default = "default_serial_baud")]
    pub baud: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { device: default_serial_device(), baud: default_serial_baud() }
    }
}

fn default_serial_device() -> String {
    "/dev/ttyACM0".to_string()
}

fn default_serial_baud() -> u32 {
    115200
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorConfig {
    /// Minimum reported speed; readings below it are filtered on-device
    #[serde(default = "default_min_speed")]
    pub min_speed: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self { min_speed: default_min_speed() }
    }
}

fn default_min_speed() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Minimum seconds between two emitted events (0 disables debouncing)
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: u64,
    /// Include the direction field in published events
    #[serde(default = "default_include_direction")]
    pub include_direction: bool,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            debounce_secs: default_debounce_secs(),
            include_direction: default_include_direction(),
        }
    }
}

fn default_debounce_secs() -> u64 {
    5
}

fn default_include_direction() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct MqttConfig {
    #[serde(default = "default_mqtt_host")]
    pub host: String,
    #[serde(default = "default_mqtt_port")]
    pub port: u16,
    /// Topic speed events are published on
    #[serde(default = "default_topic")]
    pub topic: String,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self { host: default_mqtt_host(), port: default_mqtt_port(), topic: default_topic() }
    }
}

fn default_mqtt_host() -> String {
    "localhost".to_string()
}

fn default_mqtt_port() -> u16 {
    1883
}

fn default_topic() -> String {
    "event/speed".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    #[serde(default = "default_broker_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_broker_port")]
    pub port: u16,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self { bind_address: default_broker_bind_address(), port: default_broker_port() }
    }
}

fn default_broker_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_broker_port() -> u16 {
    1883
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub mqtt: MqttConfig,
    #[serde(default)]
    pub broker: BrokerConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    serial_device: String,
    serial_baud: u32,
    min_speed: u32,
    debounce_secs: u64,
    include_direction: bool,
    mqtt_host: String,
    mqtt_port: u16,
    topic: String,
    broker_bind_address: String,
    broker_port: u16,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default")
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: &str) -> Self {
        Self {
            serial_device: toml_config.serial.device,
            serial_baud: toml_config.serial.baud,
            min_speed: toml_config.sensor.min_speed,
            debounce_secs: toml_config.events.debounce_secs,
            include_direction: toml_config.events.include_direction,
            mqtt_host: toml_config.mqtt.host,
            mqtt_port: toml_config.mqtt.port,
            topic: toml_config.mqtt.topic,
            broker_bind_address: toml_config.broker.bind_address,
            broker_port: toml_config.broker.port,
            config_file: config_file.to_string(),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, &path.display().to_string()))
    }

    /// Load configuration - tries the TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    // Getters for all config fields
    pub fn serial_device(&self) -> &str {
        &self.serial_device
    }

    pub fn serial_baud(&self) -> u32 {
        self.serial_baud
    }

    pub fn min_speed(&self) -> u32 {
        self.min_speed
    }

    pub fn debounce_secs(&self) -> u64 {
        self.debounce_secs
    }

    pub fn include_direction(&self) -> bool {
        self.include_direction
    }

    pub fn mqtt_host(&self) -> &str {
        &self.mqtt_host
    }

    pub fn mqtt_port(&self) -> u16 {
        self.mqtt_port
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn broker_bind_address(&self) -> &str {
        &self.broker_bind_address
    }

    pub fn broker_port(&self) -> u16 {
        self.broker_port
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.serial_device(), "/dev/ttyACM0");
        assert_eq!(config.serial_baud(), 115200);
        assert_eq!(config.min_speed(), 5);
        assert_eq!(config.debounce_secs(), 5);
        assert!(config.include_direction());
        assert_eq!(config.mqtt_host(), "localhost");
        assert_eq!(config.mqtt_port(), 1883);
        assert_eq!(config.topic(), "event/speed");
        assert_eq!(config.broker_bind_address(), "0.0.0.0");
        assert_eq!(config.broker_port(), 1883);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
[serial]
device = "/dev/ttyUSB1"
"#,
        )
        .unwrap();
        let config = Config::from_toml(toml_config, "partial");

        assert_eq!(config.serial_device(), "/dev/ttyUSB1");
        assert_eq!(config.serial_baud(), 115200);
        assert_eq!(config.topic(), "event/speed");
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let toml_config: TomlConfig = toml::from_str("").unwrap();
        let config = Config::from_toml(toml_config, "empty");
        assert_eq!(config.debounce_secs(), 5);
        assert_eq!(config.min_speed(), 5);
    }
}
