//! Integration tests for configuration loading

use radar_bridge::infra::Config;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[serial]
device = "/dev/ttyUSB0"
baud = 9600

[sensor]
min_speed = 10

[events]
debounce_secs = 2
include_direction = false

[mqtt]
host = "test-host"
port = 1884
topic = "test/speed"

[broker]
bind_address = "127.0.0.1"
port = 1885
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.serial_device(), "/dev/ttyUSB0");
    assert_eq!(config.serial_baud(), 9600);
    assert_eq!(config.min_speed(), 10);
    assert_eq!(config.debounce_secs(), 2);
    assert!(!config.include_direction());
    assert_eq!(config.mqtt_host(), "test-host");
    assert_eq!(config.mqtt_port(), 1884);
    assert_eq!(config.topic(), "test/speed");
    assert_eq!(config.broker_bind_address(), "127.0.0.1");
    assert_eq!(config.broker_port(), 1885);
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.serial_device(), "/dev/ttyACM0");
    assert_eq!(config.serial_baud(), 115200);
    assert_eq!(config.topic(), "event/speed");
    assert_eq!(config.debounce_secs(), 5);
}
