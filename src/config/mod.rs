//! Configuration module for serial-listen.
//!
//! This module provides TOML-based configuration with environment variable overrides.
//! With no file and no overrides the tool behaves exactly as its built-in
//! defaults: `/dev/ttyACM0`, 115200 8N1, 1 s read timeout, 15 s window, 100 ms poll.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `--config <PATH>` on the command line
//! 2. `SERIAL_LISTEN_CONFIG` environment variable (explicit path, must exist)
//! 3. `./serial-listen.toml` (current directory)
//! 4. `~/.config/serial-listen/config.toml` (XDG on Linux, platform equivalent elsewhere)
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! - `SERIAL_LISTEN_DEVICE=/dev/ttyUSB0`
//! - `SERIAL_LISTEN_BAUD=9600`
//! - `SERIAL_LISTEN_TIMEOUT_MS=500`
//! - `SERIAL_LISTEN_WINDOW_SECS=30`
//! - `SERIAL_LISTEN_POLL_INTERVAL_MS=50`
//! - `SERIAL_LISTEN_LOG_LEVEL=debug`
//!
//! # Example
//!
//! ```rust,no_run
//! use serial_listen::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load(None)?;
//! let config = loader.config();
//!
//! println!("Device: {}", config.serial.device);
//! println!("Window: {:?}", config.listen.window());
//! # Ok::<(), serial_listen::config::ConfigError>(())
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use schema::{Config, ListenConfig, LogFormat, LoggingConfig, SerialConfig};
