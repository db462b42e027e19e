//! Serial Listen Library
//!
//! Core of the `serial-listen` bring-up tool: open a board's serial port,
//! watch it for a fixed window, and print every line the firmware emits.
//!
//! # Modules
//!
//! - `config`: Configuration management with TOML support
//! - `port`: Port abstraction layer (hardware, mock, discovery)
//! - `clock`: Time source for the listen loop
//! - `line`: Line assembly and text decoding
//! - `listener`: The listen window itself
//! - `console`: Operator-facing output
//! - `error`: Unified error handling with remediation hints
//! - `logging`: Tracing subscriber setup

pub mod clock;
pub mod config;
pub mod console;
pub mod error;
pub mod line;
pub mod listener;
pub mod logging;
pub mod port;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use console::Console;
pub use error::{AppError, ErrorKind};
pub use listener::{ListenReport, ListenSettings, Listener, Outcome};
pub use port::{
    DataBits, FlowControl, MockSerialPort, Parity, PortConfiguration, PortError,
    SerialPortAdapter, StopBits, SyncSerialPort,
};
