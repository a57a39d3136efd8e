// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped interception of process exit and standard streams for tests.
//!
//! Tests can exercise code that would terminate the process or write to the
//! shared standard streams. For the duration of one scope:
//!
//! - an [`ExitGuard`] is installed as the process-wide [`Authority`], turning
//!   every [`exit`] call into an unwind carrying [`TerminationIntercepted`]
//!   while delegating every other check to the authority it replaced;
//! - a [`StreamCapture`] redirects stdout or stderr into a buffer, optionally
//!   still forwarding to the original destination.
//!
//! [`run_scoped`] installs any combination of these, runs the test body and
//! restores the previous state exactly once, even when the body panics.
//! A rule that is already installed when a nested scope enters stays
//! installed until the scope that installed it ends.
//!
//! ```ignore
//! let capture = StreamCapture::stdout(LogMode::LogOnly);
//! let expected = ExpectedExit::none().expect_exit_with_status(3);
//!
//! run_scoped(&capture, || {
//!     expected.run(|| {
//!         stdguard::outln!("shutting down");
//!         stdguard::exit(3);
//!     })
//! })?;
//! assert_eq!(capture.log(), "shutting down\n");
//! ```
//!
//! The global slots are not synchronized for concurrent scopes; tests that
//! install them must not run in parallel with each other.

mod authority;
mod error;
mod expected;
mod guard;
mod operation;
mod scope;

pub use authority::{authority, check, exit, set_authority, Authority};
pub use error::{Denied, Error, TerminationIntercepted, EXIT_NOT_CALLED};
pub use expected::ExpectedExit;
pub use guard::{ExitGuard, ExitInterception};
pub use operation::{FileTarget, Operation, SecurityContext, ThreadGroup};
pub use scope::{run_scoped, Entered, ScopeGuard, Scoped};

/// Re-exported stream capture types from the stdguard-capture crate.
pub mod capture {
    pub use stdguard_capture::*;
}

pub use stdguard_capture::{
    destination, err, errln, out, outln, set_destination, stderr, stdout, CaptureError,
    CaptureSpec, CapturedBuffer, Destination, LogMode, StandardStream, StreamCapture,
    StreamCaptureBuilder, MISSING_LOG_MODE,
};
