//! Shared test utilities for serial-listen tests.
//!
//! This module provides common test infrastructure including:
//! - A mock board whose output is scheduled on a virtual clock
//! - A harness that runs a full listen window and captures console output

#![allow(dead_code)]

use serial_listen::clock::ManualClock;
use serial_listen::port::{MockPortHandle, MockSerialPort, PortError};
use serial_listen::{Console, ListenSettings, Listener, Outcome};
use std::time::Duration;

/// Result of a captured run.
pub struct Captured {
    pub outcome: Outcome,
    pub output: String,
    pub clock: ManualClock,
}

impl Captured {
    /// Lines of output that carry the received-line label, label stripped.
    pub fn received(&self) -> Vec<&str> {
        self.output
            .lines()
            .filter_map(|line| line.strip_prefix("RECEIVED: "))
            .collect()
    }
}

/// A simulated board: a mock port plus the clock it lives on.
pub struct MockBoard {
    pub clock: ManualClock,
    pub port: MockSerialPort,
}

impl MockBoard {
    pub fn new() -> Self {
        let clock = ManualClock::new();
        let port = MockSerialPort::new("MOCK0", clock.clone());
        Self { clock, port }
    }

    /// Emit `data` at `at_ms` milliseconds after the port opens.
    pub fn emit(mut self, at_ms: u64, data: &[u8]) -> Self {
        self.port.schedule_read(Duration::from_millis(at_ms), data);
        self
    }

    /// Unplug the board at `at_ms`.
    pub fn unplug(mut self, at_ms: u64) -> Self {
        self.port.disconnect_at(Duration::from_millis(at_ms));
        self
    }

    pub fn handle(&self) -> MockPortHandle {
        self.port.handle()
    }

    /// Run a default 15 s window against this board.
    pub fn listen(self) -> Captured {
        self.listen_with(ListenSettings::default())
    }

    pub fn listen_with(self, settings: ListenSettings) -> Captured {
        let MockBoard { clock, port } = self;
        let listener = Listener::new(settings, clock.clone());
        let mut console = Console::new(Vec::new(), "RECEIVED: ", false);

        let outcome = listener.run(move || Ok::<_, PortError>(port), &mut console);

        Captured {
            outcome,
            output: String::from_utf8(console.into_inner()).expect("console output is UTF-8"),
            clock,
        }
    }
}

/// Run a window where opening the port fails with `err`.
pub fn listen_open_failure(err: PortError) -> Captured {
    let clock = ManualClock::new();
    let listener = Listener::new(ListenSettings::default(), clock.clone());
    let mut console = Console::new(Vec::new(), "RECEIVED: ", false);

    let outcome = listener.run(|| Err::<MockSerialPort, _>(err), &mut console);

    Captured {
        outcome,
        output: String::from_utf8(console.into_inner()).expect("console output is UTF-8"),
        clock,
    }
}
