//! Port-specific error types.
//!
//! Defines the closed set of failures a serial connection can report, kept
//! separate from application-level errors so the listener can tell a missing
//! device apart from a board that dropped off the bus mid-run.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during serial port operations.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// The process is not allowed to open the device node.
    #[error("Permission denied opening serial port: {0}")]
    PermissionDenied(String),

    /// Operation timed out.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The port went away while it was being used (unplugged, board reset
    /// into a bootloader, USB re-enumeration).
    #[error("Serial port disconnected: {0}")]
    Disconnected(#[source] std::io::Error),

    /// Port configuration failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other serialport-specific error.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a PermissionDenied error from a port name.
    pub fn permission_denied(port_name: impl Into<String>) -> Self {
        Self::PermissionDenied(port_name.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a Timeout error from a duration.
    pub fn timeout(duration: Duration) -> Self {
        Self::Timeout(duration)
    }

    /// Wrap a failure observed on an already-open port.
    pub fn disconnected(err: impl Into<std::io::Error>) -> Self {
        Self::Disconnected(err.into())
    }

    /// Classify an error returned while opening `port_name`.
    pub fn from_open(port_name: &str, timeout: Duration, err: serialport::Error) -> Self {
        use std::io::ErrorKind as Io;

        match err.kind() {
            serialport::ErrorKind::NoDevice | serialport::ErrorKind::Io(Io::NotFound) => {
                Self::not_found(port_name)
            }
            serialport::ErrorKind::Io(Io::PermissionDenied) => Self::permission_denied(port_name),
            serialport::ErrorKind::Io(Io::TimedOut) => Self::timeout(timeout),
            serialport::ErrorKind::InvalidInput => Self::config(err.to_string()),
            _ => Self::Serial(err),
        }
    }
}
