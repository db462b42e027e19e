use crate::config::ConfigError;
use crate::port::PortError;
use thiserror::Error;

/// Unified application error type.
///
/// Every failure the tool can hit ends up here so the binary can print it
/// together with a hint that fits what actually went wrong.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing to the operator's terminal failed (closed pipe and the like).
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Coarse classification used to choose a remediation hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    Timeout,
    Disconnected,
    Config,
    Other,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Port(PortError::NotFound(_)) => ErrorKind::NotFound,
            Self::Port(PortError::PermissionDenied(_)) => ErrorKind::PermissionDenied,
            Self::Port(PortError::Timeout(_)) => ErrorKind::Timeout,
            Self::Port(PortError::Disconnected(_)) => ErrorKind::Disconnected,
            Self::Port(PortError::Config(_)) | Self::Config(_) => ErrorKind::Config,
            Self::Port(PortError::Serial(_)) | Self::Output(_) => ErrorKind::Other,
        }
    }

    /// Static advice printed after the error message.
    pub fn remediation(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => {
                "Check the USB cable and run `serial-listen --list-ports`. If the board never \
                 shows up, install the CDC-ACM driver: sudo apt install linux-modules-extra-$(uname -r)"
            }
            ErrorKind::PermissionDenied => {
                "Add yourself to the dialout group, then log out and back in: sudo usermod -aG dialout $USER"
            }
            ErrorKind::Timeout => {
                "Check the baud rate and make sure the board is not held in reset."
            }
            ErrorKind::Disconnected => {
                "The board disappeared mid-run (reset into bootloader or cable unplugged). \
                 Re-run once it is enumerated again."
            }
            ErrorKind::Config => {
                "Check --config, serial-listen.toml and any SERIAL_LISTEN_* environment variables."
            }
            ErrorKind::Other => {
                "Make sure no other program holds the port, and that the serial driver is \
                 installed: sudo apt install linux-modules-extra-$(uname -r)"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_kinds_are_distinct() {
        let cases = [
            (AppError::from(PortError::not_found("/dev/ttyACM0")), ErrorKind::NotFound),
            (
                AppError::from(PortError::permission_denied("/dev/ttyACM0")),
                ErrorKind::PermissionDenied,
            ),
            (
                AppError::from(PortError::timeout(Duration::from_secs(1))),
                ErrorKind::Timeout,
            ),
            (
                AppError::from(PortError::disconnected(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "gone",
                ))),
                ErrorKind::Disconnected,
            ),
            (
                AppError::from(ConfigError::validation("serial.baud_rate", "zero")),
                ErrorKind::Config,
            ),
        ];

        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[test]
    fn test_not_found_hint_mentions_apt() {
        let err = AppError::from(PortError::not_found("/dev/ttyACM0"));
        assert!(err.remediation().contains("apt install"));
        assert_eq!(err.to_string(), "Serial port not found: /dev/ttyACM0");
    }

    #[test]
    fn test_permission_hint_mentions_dialout() {
        let err = AppError::from(PortError::permission_denied("/dev/ttyACM0"));
        assert!(err.remediation().contains("dialout"));
    }
}
