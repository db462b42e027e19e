//! Configuration schema definitions.
//!
//! This module defines the structure of the configuration file using serde.
//! Every default matches the values the tool has always used, so running
//! without a config file listens on `/dev/ttyACM0` at 115200 baud for 15 s.

use super::error::{ConfigError, ConfigResult};
use crate::port::{DataBits, FlowControl, Parity, PortConfiguration, StopBits};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial port configuration
    pub serial: SerialConfig,
    /// Listen window configuration
    pub listen: ListenConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values that would make the listener misbehave.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.serial.device.trim().is_empty() {
            return Err(ConfigError::validation("serial.device", "must not be empty"));
        }
        if self.serial.baud_rate == 0 {
            return Err(ConfigError::validation("serial.baud_rate", "must be greater than 0"));
        }
        if self.serial.timeout_ms == 0 {
            return Err(ConfigError::validation("serial.timeout_ms", "must be greater than 0"));
        }
        if self.listen.window_secs <= 0.0
            || Duration::try_from_secs_f64(self.listen.window_secs).is_err()
        {
            return Err(ConfigError::validation(
                "listen.window_secs",
                "must be a positive number of seconds",
            ));
        }
        if self.listen.poll_interval_ms == 0 {
            return Err(ConfigError::validation(
                "listen.poll_interval_ms",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Serial port configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path of the board's serial port
    pub device: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Per-read timeout in milliseconds
    pub timeout_ms: u64,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
}

impl Default for SerialConfig {
    fn default() -> Self {
        let port = PortConfiguration::default();
        Self {
            device: "/dev/ttyACM0".to_string(),
            baud_rate: port.baud_rate,
            timeout_ms: port.timeout.as_millis() as u64,
            data_bits: port.data_bits,
            parity: port.parity,
            stop_bits: port.stop_bits,
            flow_control: port.flow_control,
        }
    }
}

impl SerialConfig {
    /// Get the read timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parameters for opening the port.
    pub fn port_configuration(&self) -> PortConfiguration {
        PortConfiguration {
            baud_rate: self.baud_rate,
            data_bits: self.data_bits,
            flow_control: self.flow_control,
            parity: self.parity,
            stop_bits: self.stop_bits,
            timeout: self.timeout(),
        }
    }
}

/// Listen window configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    /// How long to watch the port, in seconds
    pub window_secs: f64,
    /// Delay between availability checks, in milliseconds
    pub poll_interval_ms: u64,
    /// Prefix printed before every received line
    pub label: String,
    /// Prefix received lines with the local time
    pub timestamps: bool,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            window_secs: 15.0,
            poll_interval_ms: 100,
            label: "RECEIVED: ".to_string(),
            timestamps: false,
        }
    }
}

impl ListenConfig {
    /// Get the listen window as Duration
    pub fn window(&self) -> Duration {
        Duration::from_secs_f64(self.window_secs)
    }

    /// Get the poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive, e.g. "warn" or "serial_listen=debug"
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    Pretty,
    /// Compact format
    #[default]
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.serial.device, "/dev/ttyACM0");
        assert_eq!(config.serial.baud_rate, 115200);
        assert_eq!(config.serial.timeout(), Duration::from_secs(1));
        assert_eq!(config.listen.window(), Duration::from_secs(15));
        assert_eq!(config.listen.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.listen.label, "RECEIVED: ");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_port_configuration_is_8n1() {
        let port = SerialConfig::default().port_configuration();
        assert_eq!(port, PortConfiguration::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[serial]"));
        assert!(toml_str.contains("[listen]"));
        assert!(toml_str.contains("data_bits = 8"));
        assert!(toml_str.contains("parity = \"none\""));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [serial]
            device = "/dev/ttyUSB1"
            baud_rate = 9600
            stop_bits = 2

            [listen]
            window_secs = 2.5
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.serial.device, "/dev/ttyUSB1");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.serial.stop_bits, StopBits::Two);
        assert_eq!(config.listen.window(), Duration::from_millis(2500));
        // Defaults should still work
        assert_eq!(config.listen.poll_interval_ms, 100);
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_invalid_data_bits_rejected() {
        let result: Result<Config, _> = toml::from_str("[serial]\ndata_bits = 9\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();
        config.listen.window_secs = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { ref key, .. }) if key == "listen.window_secs"
        ));

        let mut config = Config::default();
        config.serial.baud_rate = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.listen.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.serial.device = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
