//! Port abstraction layer for serial communication.
//!
//! Provides the `SerialPortAdapter` trait, a hardware implementation over the
//! `serialport` crate and a clock-driven mock for tests.

pub mod discovery;
pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use discovery::{describe, list_ports};
pub use error::PortError;
pub use mock::{MockPortHandle, MockSerialPort};
pub use sync_port::SyncSerialPort;
pub use traits::*;
