//! Mock serial port implementation for testing.
//!
//! Provides a `MockSerialPort` that simulates a board's serial output without
//! requiring hardware. Bytes can be queued immediately or scheduled to
//! "arrive" at a point on a shared [`ManualClock`], and the port can be told
//! to drop off the bus at a given time.

use super::error::PortError;
use super::traits::SerialPortAdapter;
use crate::clock::ManualClock;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Inner state of the mock port, shared with any [`MockPortHandle`].
#[derive(Debug, Default)]
struct MockPortState {
    /// Bytes already "received" and waiting to be read.
    read_queue: VecDeque<u8>,
    /// Future arrivals, kept sorted by arrival time.
    scheduled: VecDeque<(Duration, Vec<u8>)>,
    /// Time at which the device disappears.
    disconnect_at: Option<Duration>,
    /// Number of bytes handed out by `read_bytes`.
    bytes_read: usize,
    /// Number of times the port has been closed (dropped).
    close_count: usize,
}

impl MockPortState {
    /// Move every scheduled chunk whose arrival time has passed into the read queue.
    fn deliver_due(&mut self, now: Duration) {
        while let Some((at, _)) = self.scheduled.front() {
            if *at > now {
                break;
            }
            if let Some((_, data)) = self.scheduled.pop_front() {
                self.read_queue.extend(data);
            }
        }
    }

    fn check_connected(&self, now: Duration) -> Result<(), PortError> {
        match self.disconnect_at {
            Some(at) if now >= at => Err(PortError::disconnected(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "device unplugged",
            ))),
            _ => Ok(()),
        }
    }
}

/// Mock serial port implementation for testing.
///
/// # Example
/// ```
/// use serial_listen::clock::ManualClock;
/// use serial_listen::port::{MockSerialPort, SerialPortAdapter};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let mut port = MockSerialPort::new("MOCK0", clock.clone());
/// port.schedule_read(Duration::from_secs(1), b"BOOT OK\n");
///
/// assert_eq!(port.bytes_to_read().unwrap(), 0);
/// clock.advance(Duration::from_secs(1));
/// assert_eq!(port.bytes_to_read().unwrap(), 8);
/// ```
pub struct MockSerialPort {
    /// The port name/identifier.
    name: String,
    /// Shared timeline used to decide which scheduled bytes have arrived.
    clock: ManualClock,
    state: Arc<Mutex<MockPortState>>,
}

/// Inspection handle that stays valid after the port itself has been dropped.
#[derive(Debug, Clone)]
pub struct MockPortHandle {
    state: Arc<Mutex<MockPortState>>,
}

impl MockPortHandle {
    /// How many times the port has been closed.
    pub fn close_count(&self) -> usize {
        self.state.lock().close_count
    }

    /// Total bytes returned by reads so far.
    pub fn bytes_read(&self) -> usize {
        self.state.lock().bytes_read
    }

    /// Bytes received (or scheduled) but never read.
    pub fn unread_bytes(&self) -> usize {
        let state = self.state.lock();
        state.read_queue.len() + state.scheduled.iter().map(|(_, d)| d.len()).sum::<usize>()
    }
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name on `clock`'s timeline.
    pub fn new(name: impl Into<String>, clock: ManualClock) -> Self {
        Self {
            name: name.into(),
            clock,
            state: Arc::new(Mutex::new(MockPortState::default())),
        }
    }

    /// Enqueue bytes that are available to read right away.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        self.state.lock().read_queue.extend(data);
    }

    /// Schedule bytes to arrive once the clock reaches `at`.
    pub fn schedule_read(&mut self, at: Duration, data: &[u8]) {
        let mut state = self.state.lock();
        let idx = state
            .scheduled
            .iter()
            .position(|(existing, _)| *existing > at)
            .unwrap_or(state.scheduled.len());
        state.scheduled.insert(idx, (at, data.to_vec()));
    }

    /// Make every operation fail from `at` onwards, as if the cable was pulled.
    pub fn disconnect_at(&mut self, at: Duration) {
        self.state.lock().disconnect_at = Some(at);
    }

    /// Handle for inspecting the port after it has been moved into the listener.
    pub fn handle(&self) -> MockPortHandle {
        MockPortHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let now = self.clock.elapsed();
        let mut state = self.state.lock();
        state.check_connected(now)?;
        state.deliver_due(now);

        let mut bytes_read = 0;
        for byte in buffer.iter_mut() {
            match state.read_queue.pop_front() {
                Some(queued) => {
                    *byte = queued;
                    bytes_read += 1;
                }
                None => break,
            }
        }

        if bytes_read == 0 {
            return Err(PortError::timeout(Duration::from_secs(1)));
        }
        state.bytes_read += bytes_read;
        Ok(bytes_read)
    }

    fn bytes_to_read(&self) -> Result<usize, PortError> {
        let now = self.clock.elapsed();
        let mut state = self.state.lock();
        state.check_connected(now)?;
        state.deliver_due(now);
        Ok(state.read_queue.len())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for MockSerialPort {
    fn drop(&mut self) {
        self.state.lock().close_count += 1;
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("unread_bytes", &self.handle().unread_bytes())
            .finish()
    }
}
