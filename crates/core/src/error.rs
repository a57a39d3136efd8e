// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy and the termination signal.

use std::any::Any;
use std::panic;
use stdguard_capture::CaptureError;
use thiserror::Error;

/// Message carried by [`Error::IllegalState`] when the first exit status is
/// queried before any termination attempt.
pub const EXIT_NOT_CALLED: &str = "checkExit(int) has not been called.";

/// Errors produced by authorities, guards and scoped rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Required configuration absent at construction time
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// A termination attempt was converted into this signal
    #[error(transparent)]
    TerminationIntercepted(#[from] TerminationIntercepted),

    #[error("{0}")]
    IllegalState(&'static str),

    /// Denial raised by an authority, passed through unchanged
    #[error(transparent)]
    Denied(#[from] Denied),

    #[error("Expected exit, but exit was not called.")]
    ExitNotCalled,

    #[error("Wrong exit status: expected {expected}, got {actual}")]
    UnexpectedExitStatus { expected: i32, actual: i32 },

    #[error("Unexpected call of exit({status}).")]
    UnexpectedExit { status: i32 },
}

/// Signal raised in place of process termination.
///
/// [`crate::exit`] unwinds with this value as the payload, so it can be
/// recovered with [`std::panic::catch_unwind`] and
/// [`TerminationIntercepted::from_panic`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Termination intercepted with status {status}")]
pub struct TerminationIntercepted {
    status: i32,
}

impl TerminationIntercepted {
    pub fn new(status: i32) -> Self {
        Self { status }
    }

    /// Status code of the intercepted termination attempt
    pub fn status(&self) -> i32 {
        self.status
    }

    /// Unwind the current thread with this signal as the payload.
    ///
    /// The panic hook is not invoked.
    pub fn raise(self) -> ! {
        panic::resume_unwind(Box::new(self))
    }

    /// Recover the signal from a caught unwind payload
    pub fn from_panic(payload: &(dyn Any + Send)) -> Option<Self> {
        payload.downcast_ref::<Self>().copied()
    }
}

/// An authority refused an operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{operation} denied: {reason}")]
pub struct Denied {
    pub operation: String,
    pub reason: String,
}

impl Denied {
    pub fn new(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}
