// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide standard stream destinations.
//!
//! Each standard stream has a single mutable slot holding its current
//! destination. Installing a capture swaps the slot and remembers the old
//! value; restoring swaps the old value back.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// One of the process's standard output channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardStream {
    /// Standard output
    #[default]
    Stdout,
    /// Standard error
    Stderr,
}

impl StandardStream {
    /// Stream name as used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }

    fn slot(self) -> &'static Mutex<Option<Destination>> {
        match self {
            Self::Stdout => &STDOUT,
            Self::Stderr => &STDERR,
        }
    }
}

impl fmt::Display for StandardStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// `None` means the real process stream.
static STDOUT: Mutex<Option<Destination>> = parking_lot::const_mutex(None);
static STDERR: Mutex<Option<Destination>> = parking_lot::const_mutex(None);

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

#[derive(Clone)]
enum Target {
    Process(StandardStream),
    Writer(SharedWriter),
}

/// Where writes to a standard stream currently go.
///
/// Cheap to clone. Two destinations compare equal when they are the same
/// process stream or share the same writer.
#[derive(Clone)]
pub struct Destination(Target);

impl Destination {
    /// The real process stream
    pub fn process(stream: StandardStream) -> Self {
        Self(Target::Process(stream))
    }

    /// A custom writer
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self(Target::Writer(Arc::new(Mutex::new(Box::new(writer)))))
    }

    /// Check if this is a real process stream
    pub fn is_process(&self) -> bool {
        matches!(self.0, Target::Process(_))
    }

    /// Write all of `data`, flushing process streams immediately.
    pub fn write_all(&self, data: &[u8]) -> io::Result<()> {
        match &self.0 {
            Target::Process(StandardStream::Stdout) => {
                let mut out = io::stdout().lock();
                out.write_all(data)?;
                out.flush()
            }
            Target::Process(StandardStream::Stderr) => io::stderr().lock().write_all(data),
            Target::Writer(writer) => writer.lock().write_all(data),
        }
    }

    /// Flush the underlying writer
    pub fn flush(&self) -> io::Result<()> {
        match &self.0 {
            Target::Process(StandardStream::Stdout) => io::stdout().flush(),
            Target::Process(StandardStream::Stderr) => io::stderr().flush(),
            Target::Writer(writer) => writer.lock().flush(),
        }
    }
}

impl PartialEq for Destination {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Target::Process(a), Target::Process(b)) => a == b,
            (Target::Writer(a), Target::Writer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Destination {}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Target::Process(stream) => write!(f, "Destination::Process({})", stream),
            Target::Writer(writer) => write!(f, "Destination::Writer({:p})", Arc::as_ptr(writer)),
        }
    }
}

/// The destination currently installed for `stream`.
pub fn destination(stream: StandardStream) -> Destination {
    stream
        .slot()
        .lock()
        .clone()
        .unwrap_or_else(|| Destination::process(stream))
}

/// Install `destination` for `stream`, returning the one it replaces.
pub fn set_destination(stream: StandardStream, destination: Destination) -> Destination {
    let next = if destination.is_process() {
        None
    } else {
        Some(destination)
    };
    std::mem::replace(&mut *stream.slot().lock(), next)
        .unwrap_or_else(|| Destination::process(stream))
}

/// Writer handle that always routes to the currently installed destination.
///
/// The destination is looked up on every write, so a handle obtained before
/// a capture is installed is still captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamWriter {
    stream: StandardStream,
}

impl StreamWriter {
    /// Handle for `stream`
    pub fn new(stream: StandardStream) -> Self {
        Self { stream }
    }

    /// The stream this handle writes to
    pub fn stream(&self) -> StandardStream {
        self.stream
    }
}

impl Write for StreamWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        destination(self.stream).write_all(buf)?;
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        destination(self.stream).write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        destination(self.stream).flush()
    }
}

/// Handle to the current standard output destination
pub fn stdout() -> StreamWriter {
    StreamWriter::new(StandardStream::Stdout)
}

/// Handle to the current standard error destination
pub fn stderr() -> StreamWriter {
    StreamWriter::new(StandardStream::Stderr)
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
