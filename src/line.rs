//! Splitting the raw byte stream into printable lines.
//!
//! Bytes are accumulated until a `\n` shows up. Each complete line is decoded
//! as UTF-8 with invalid sequences dropped, then trimmed; lines that end up
//! empty are discarded by the caller.

use memchr::memchr;

/// Accumulates received bytes and hands back complete lines.
#[derive(Debug, Default)]
pub struct LineAssembler {
    pending: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append freshly received bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Pop the next complete line, without its `\n`.
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        let end = memchr(b'\n', &self.pending)?;
        let mut line: Vec<u8> = self.pending.drain(..=end).collect();
        line.pop();
        Some(line)
    }

    /// True when bytes without a terminating newline are buffered.
    pub fn has_partial(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take whatever is buffered, terminated or not.
    pub fn take_partial(&mut self) -> Option<Vec<u8>> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }
}

/// Decode `raw` as UTF-8, silently dropping invalid byte sequences.
pub fn decode_dropping_invalid(raw: &[u8]) -> String {
    let mut text = String::with_capacity(raw.len());
    for chunk in raw.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Decode and trim a raw line. Returns `None` when nothing printable is left.
pub fn clean_line(raw: &[u8]) -> Option<String> {
    let text = decode_dropping_invalid(raw);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
