//! The port listener: open, watch for a fixed window, print, summarise.
//!
//! ```text
//! NotOpened --open ok--> Listening --window elapsed--> Done
//!     |                      |
//!     +--open failed--> ErrorReported <--I/O failure--+
//! ```
//!
//! The port is owned by [`Listener::run`]'s scope and dropped on every exit
//! path, so it is closed exactly once whether the run completes or fails.

use crate::clock::Clock;
use crate::config::Config;
use crate::console::Console;
use crate::error::AppError;
use crate::line::{clean_line, LineAssembler};
use crate::port::{PortError, SerialPortAdapter};
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Upper bound for a single read.
const READ_CHUNK: usize = 1024;

/// Timing parameters of a listen run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenSettings {
    /// Total time spent watching the port.
    pub window: Duration,
    /// Delay between availability checks.
    pub poll_interval: Duration,
    /// How long an unterminated line is held, from its first byte, before it
    /// is printed anyway.
    pub read_timeout: Duration,
}

impl Default for ListenSettings {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(15),
            poll_interval: Duration::from_millis(100),
            read_timeout: Duration::from_secs(1),
        }
    }
}

impl ListenSettings {
    /// Settings from an already validated config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            window: config.listen.window(),
            poll_interval: config.listen.poll_interval(),
            read_timeout: config.serial.timeout(),
        }
    }
}

/// Summary of a completed listen window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenReport {
    /// Lines printed.
    pub lines: usize,
    /// Raw bytes received, including newlines and dropped sequences.
    pub bytes: usize,
    /// Time from loop start to loop exit.
    pub elapsed: Duration,
}

/// How a run ended. Errors have already been shown to the operator.
#[derive(Debug)]
pub enum Outcome {
    Completed(ListenReport),
    Failed(AppError),
}

impl Outcome {
    /// Process exit status.
    ///
    /// Without `strict` the tool always exits 0. With it: 1 on error, 2 when
    /// the window passed in silence.
    pub fn exit_code(&self, strict: bool) -> u8 {
        if !strict {
            return 0;
        }
        match self {
            Self::Completed(report) if report.lines > 0 => 0,
            Self::Completed(_) => 2,
            Self::Failed(_) => 1,
        }
    }
}

/// Watches one serial port for a fixed window.
#[derive(Debug)]
pub struct Listener<C: Clock> {
    settings: ListenSettings,
    clock: C,
}

impl<C: Clock> Listener<C> {
    pub fn new(settings: ListenSettings, clock: C) -> Self {
        Self { settings, clock }
    }

    /// Open the port with `open`, listen, and report.
    ///
    /// Never panics on device trouble: any failure is printed to `console`
    /// with a remediation hint and returned as [`Outcome::Failed`].
    pub fn run<P, F, W>(&self, open: F, console: &mut Console<W>) -> Outcome
    where
        P: SerialPortAdapter,
        F: FnOnce() -> Result<P, PortError>,
        W: Write,
    {
        match self.try_run(open, console) {
            Ok(report) => Outcome::Completed(report),
            Err(err) => {
                warn!(error = %err, kind = ?err.kind(), "listen run failed");
                if let Err(write_err) = console.error(&err) {
                    warn!(error = %write_err, "could not report failure to console");
                }
                Outcome::Failed(err)
            }
        }
    }

    fn try_run<P, F, W>(&self, open: F, console: &mut Console<W>) -> Result<ListenReport, AppError>
    where
        P: SerialPortAdapter,
        F: FnOnce() -> Result<P, PortError>,
        W: Write,
    {
        let mut port = open()?;
        console.opened()?;

        let report = self.listen(&mut port, console)?;
        console.complete(&report)?;
        info!(
            port = port.name(),
            lines = report.lines,
            bytes = report.bytes,
            "listen window complete"
        );
        Ok(report)
    }

    /// Poll `port` until the window has elapsed, printing each line.
    pub fn listen<P, W>(&self, port: &mut P, console: &mut Console<W>) -> Result<ListenReport, AppError>
    where
        P: SerialPortAdapter,
        W: Write,
    {
        let start = self.clock.now();
        // When the oldest byte of the unterminated tail arrived.
        let mut partial_since: Option<Instant> = None;
        let mut lines = LineAssembler::new();
        let mut buffer = [0u8; READ_CHUNK];
        let mut report = ListenReport::default();

        debug!(port = port.name(), window = ?self.settings.window, "listening");

        while self.elapsed_since(start) < self.settings.window {
            let waiting = port.bytes_to_read()?;
            if waiting > 0 {
                let want = waiting.min(buffer.len());
                match port.read_bytes(&mut buffer[..want]) {
                    Ok(n) => {
                        debug!(bytes = n, "read");
                        lines.extend(&buffer[..n]);
                        report.bytes += n;

                        let mut completed = false;
                        while let Some(raw) = lines.next_line() {
                            completed = true;
                            self.emit(&raw, console, &mut report)?;
                        }
                        partial_since = match partial_since {
                            _ if !lines.has_partial() => None,
                            Some(since) if !completed => Some(since),
                            _ => Some(self.clock.now()),
                        };
                    }
                    Err(PortError::Timeout(_)) => {}
                    Err(e) => return Err(e.into()),
                }
            }

            // A line read gives up after the read timeout even while bytes
            // keep arriving, so an unterminated stream still shows up live.
            if let Some(since) = partial_since {
                if self.elapsed_since(since) >= self.settings.read_timeout {
                    if let Some(raw) = lines.take_partial() {
                        self.emit(&raw, console, &mut report)?;
                    }
                    partial_since = None;
                }
            }

            self.clock.sleep(self.settings.poll_interval);
        }

        if let Some(raw) = lines.take_partial() {
            self.emit(&raw, console, &mut report)?;
        }

        report.elapsed = self.elapsed_since(start);
        Ok(report)
    }

    fn emit<W: Write>(
        &self,
        raw: &[u8],
        console: &mut Console<W>,
        report: &mut ListenReport,
    ) -> Result<(), AppError> {
        match clean_line(raw) {
            Some(line) => {
                console.line(&line)?;
                report.lines += 1;
            }
            None => debug!(len = raw.len(), "skipping blank line"),
        }
        Ok(())
    }

    fn elapsed_since(&self, earlier: Instant) -> Duration {
        self.clock.now().saturating_duration_since(earlier)
    }
}
