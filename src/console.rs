//! Operator-facing output.
//!
//! Everything the person at the bench reads goes through [`Console`]. Output
//! is flushed after every message so lines show up while the board is still
//! booting, even when stdout is a pipe.

use crate::config::ListenConfig;
use crate::error::AppError;
use crate::listener::ListenReport;
use serialport::SerialPortInfo;
use std::io::{self, Write};

pub const OPENED: &str = "Serial port opened. Waiting for data...";
pub const RESET_PROMPT: &str = "Press RESET button on the board now!";
pub const COMPLETE: &str =
    "Test complete. If nothing received, there may be an issue with Serial in the firmware.";

/// Writes operator messages to any `Write` sink.
#[derive(Debug)]
pub struct Console<W: Write> {
    out: W,
    label: String,
    timestamps: bool,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, label: impl Into<String>, timestamps: bool) -> Self {
        Self {
            out,
            label: label.into(),
            timestamps,
        }
    }

    pub fn from_config(out: W, config: &ListenConfig) -> Self {
        Self::new(out, config.label.clone(), config.timestamps)
    }

    /// Banner shown once the port is open.
    pub fn opened(&mut self) -> io::Result<()> {
        writeln!(self.out, "{OPENED}")?;
        writeln!(self.out, "{RESET_PROMPT}")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    /// One received line.
    pub fn line(&mut self, line: &str) -> io::Result<()> {
        if self.timestamps {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            writeln!(self.out, "[{now}] {}{line}", self.label)?;
        } else {
            writeln!(self.out, "{}{line}", self.label)?;
        }
        self.out.flush()
    }

    /// Closing message plus a one-line summary.
    pub fn complete(&mut self, report: &ListenReport) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{COMPLETE}")?;
        writeln!(
            self.out,
            "Received {} line(s), {} byte(s) in {:.1}s",
            report.lines,
            report.bytes,
            report.elapsed.as_secs_f64()
        )?;
        self.out.flush()
    }

    /// Error message followed by a hint for that kind of failure.
    pub fn error(&mut self, err: &AppError) -> io::Result<()> {
        writeln!(self.out, "Error: {err}")?;
        writeln!(self.out)?;
        writeln!(self.out, "Try: {}", err.remediation())?;
        self.out.flush()
    }

    /// Listing for `--list-ports`.
    pub fn port_list(&mut self, ports: &[SerialPortInfo]) -> io::Result<()> {
        if ports.is_empty() {
            writeln!(self.out, "No serial ports detected on this system.")?;
        } else {
            writeln!(self.out, "Found {} serial port(s):", ports.len())?;
            for info in ports {
                writeln!(self.out)?;
                for line in crate::port::describe(info) {
                    writeln!(self.out, "{line}")?;
                }
            }
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
