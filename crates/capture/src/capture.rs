// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped capture of a standard stream into a [`CapturedBuffer`].

use crate::buffer::CapturedBuffer;
use crate::error::CaptureError;
use crate::stream::{self, Destination, StandardStream};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Whether captured writes still reach the original destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogMode {
    /// Capture only; the original destination sees nothing
    LogOnly,
    /// Capture and forward every write unchanged to the original destination
    LogAndWrite,
}

/// Writer installed over a stream while a capture is active.
struct TeeWriter {
    buffer: CapturedBuffer,
    forward: Option<Destination>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.append(buf);
        if let Some(ref forward) = self.forward {
            forward.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.forward {
            Some(ref forward) => forward.flush(),
            None => Ok(()),
        }
    }
}

/// Redirects one standard stream into an in-memory log.
///
/// The log stays readable after [`restore`](Self::restore) but no longer
/// receives writes:
/// ```ignore
/// let capture = StreamCapture::stdout(LogMode::LogOnly);
/// capture.install();
/// stdguard_capture::out!("hello");
/// capture.restore();
/// assert_eq!(capture.log(), "hello");
/// ```
#[derive(Debug)]
pub struct StreamCapture {
    stream: StandardStream,
    mode: LogMode,
    buffer: CapturedBuffer,
    previous: Mutex<Option<Destination>>,
}

impl StreamCapture {
    /// Create a capture for `stream` with an explicit mode
    pub fn new(stream: StandardStream, mode: LogMode) -> Self {
        Self {
            stream,
            mode,
            buffer: CapturedBuffer::new(),
            previous: Mutex::new(None),
        }
    }

    /// Capture standard output
    pub fn stdout(mode: LogMode) -> Self {
        Self::new(StandardStream::Stdout, mode)
    }

    /// Capture standard error
    pub fn stderr(mode: LogMode) -> Self {
        Self::new(StandardStream::Stderr, mode)
    }

    /// Start building a capture; the mode must be set before `build`
    pub fn builder() -> StreamCaptureBuilder {
        StreamCaptureBuilder::default()
    }

    pub fn stream(&self) -> StandardStream {
        self.stream
    }

    pub fn mode(&self) -> LogMode {
        self.mode
    }

    /// Check if the capture is currently installed over its stream
    pub fn is_installed(&self) -> bool {
        self.previous.lock().is_some()
    }

    /// Swap the stream's destination for the capturing writer.
    ///
    /// Returns `false` without doing anything when the capture is already
    /// installed.
    pub fn install(&self) -> bool {
        let mut previous = self.previous.lock();
        if previous.is_some() {
            tracing::debug!(stream = %self.stream, "capture already installed");
            return false;
        }

        let forward = match self.mode {
            LogMode::LogOnly => None,
            LogMode::LogAndWrite => Some(stream::destination(self.stream)),
        };
        let writer = TeeWriter {
            buffer: self.buffer.clone(),
            forward,
        };
        *previous = Some(stream::set_destination(self.stream, Destination::new(writer)));
        tracing::debug!(stream = %self.stream, mode = ?self.mode, "installed stream capture");
        true
    }

    /// Put back the destination recorded by [`install`](Self::install).
    pub fn restore(&self) {
        if let Some(previous) = self.previous.lock().take() {
            stream::set_destination(self.stream, previous);
            tracing::debug!(stream = %self.stream, "restored stream destination");
        }
    }

    /// Captured text, decoding invalid UTF-8 lossily
    pub fn log(&self) -> String {
        self.buffer.text()
    }

    /// Captured text with `\r\n` line separators replaced by `\n`
    pub fn log_normalized(&self) -> String {
        self.log().replace("\r\n", "\n")
    }

    /// Captured raw bytes
    pub fn log_bytes(&self) -> Vec<u8> {
        self.buffer.snapshot()
    }

    /// Discard the log; later writes accumulate from empty
    pub fn clear(&self) {
        self.buffer.clear();
    }

    pub fn buffer(&self) -> &CapturedBuffer {
        &self.buffer
    }
}

/// Builder for [`StreamCapture`].
///
/// There is no default mode: building without one fails with
/// [`CaptureError::InvalidConfiguration`].
#[derive(Clone, Debug, Default)]
pub struct StreamCaptureBuilder {
    stream: StandardStream,
    mode: Option<LogMode>,
}

impl StreamCaptureBuilder {
    pub fn stream(mut self, stream: StandardStream) -> Self {
        self.stream = stream;
        self
    }

    pub fn mode(mut self, mode: LogMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn build(self) -> Result<StreamCapture, CaptureError> {
        let mode = self.mode.ok_or_else(CaptureError::missing_log_mode)?;
        Ok(StreamCapture::new(self.stream, mode))
    }
}

/// Declarative capture configuration, loadable from TOML or JSON.
///
/// ```toml
/// stream = "stderr"
/// mode = "log_and_write"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptureSpec {
    /// Stream to capture (default: stdout)
    #[serde(default)]
    pub stream: StandardStream,

    /// Required capture mode
    #[serde(default)]
    pub mode: Option<LogMode>,
}

impl CaptureSpec {
    pub fn from_toml(source: &str) -> Result<Self, CaptureError> {
        toml::from_str(source).map_err(|e| CaptureError::Parse(e.to_string()))
    }

    pub fn from_json(source: &str) -> Result<Self, CaptureError> {
        serde_json::from_str(source).map_err(|e| CaptureError::Parse(e.to_string()))
    }
}

impl TryFrom<CaptureSpec> for StreamCapture {
    type Error = CaptureError;

    fn try_from(spec: CaptureSpec) -> Result<Self, Self::Error> {
        let mut builder = StreamCapture::builder().stream(spec.stream);
        if let Some(mode) = spec.mode {
            builder = builder.mode(mode);
        }
        builder.build()
    }
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
