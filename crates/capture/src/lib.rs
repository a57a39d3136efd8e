// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Standard stream capture for test assertions.
//!
//! This crate redirects the process-wide standard output or standard error
//! destination into an in-memory buffer for the duration of a test, optionally
//! still forwarding every write to the original destination.
//!
//! Rust's `print!` family cannot be redirected on stable, so code under test
//! writes through [`stdout()`], [`stderr()`] or the [`out!`], [`outln!`],
//! [`err!`] and [`errln!`] macros. Those always route to whatever destination
//! is currently installed for the stream.
//!
//! With no capture installed the process stream is written through its file
//! descriptor, bypassing libtest's own output capture: such writes show up in
//! `cargo test` output even for passing tests.

mod buffer;
mod capture;
mod error;
mod stream;

pub use buffer::CapturedBuffer;
pub use capture::{CaptureSpec, LogMode, StreamCapture, StreamCaptureBuilder};
pub use error::{CaptureError, MISSING_LOG_MODE};
pub use stream::{
    destination, set_destination, stderr, stdout, Destination, StandardStream, StreamWriter,
};

/// Write formatted text to the current standard output destination.
///
/// Write errors are ignored.
#[macro_export]
macro_rules! out {
    ($($arg:tt)*) => {{
        use ::std::io::Write as _;
        let _ = ::std::write!($crate::stdout(), $($arg)*);
    }};
}

/// Write formatted text and a newline to the current standard output destination.
#[macro_export]
macro_rules! outln {
    () => {
        $crate::out!("\n")
    };
    ($($arg:tt)*) => {{
        use ::std::io::Write as _;
        let _ = ::std::writeln!($crate::stdout(), $($arg)*);
    }};
}

/// Write formatted text to the current standard error destination.
///
/// Write errors are ignored.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {{
        use ::std::io::Write as _;
        let _ = ::std::write!($crate::stderr(), $($arg)*);
    }};
}

/// Write formatted text and a newline to the current standard error destination.
#[macro_export]
macro_rules! errln {
    () => {
        $crate::err!("\n")
    };
    ($($arg:tt)*) => {{
        use ::std::io::Write as _;
        let _ = ::std::writeln!($crate::stderr(), $($arg)*);
    }};
}
