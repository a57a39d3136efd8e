// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Appendable, clearable byte sink shared between a capture and its writer.

use parking_lot::Mutex;
use std::fmt;
use std::io;
use std::sync::Arc;

/// In-memory sink for captured stream output.
///
/// Clones share the same storage, so the writer installed over a stream and
/// the capture that reads the log observe the same bytes.
#[derive(Clone, Default)]
pub struct CapturedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CapturedBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes to the end of the buffer
    pub fn append(&self, data: &[u8]) {
        self.bytes.lock().extend_from_slice(data);
    }

    /// Discard everything captured so far
    pub fn clear(&self) {
        self.bytes.lock().clear();
    }

    /// Copy of every byte written since creation or the last [`clear`](Self::clear)
    pub fn snapshot(&self) -> Vec<u8> {
        self.bytes.lock().clone()
    }

    /// Captured bytes decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Number of captured bytes
    pub fn len(&self) -> usize {
        self.bytes.lock().len()
    }

    /// Check if nothing has been captured
    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }
}

impl io::Write for CapturedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for CapturedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedBuffer")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
