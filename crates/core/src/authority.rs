// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The process-wide authority that decides whether sensitive operations,
//! including termination, are allowed.
//!
//! At most one authority is current. Each authority may wrap the one it
//! replaced and delegate to it; the default method bodies of [`Authority`]
//! do exactly that, falling back to "no restriction" when there is nothing
//! to delegate to.

use crate::error::Error;
use crate::operation::{Operation, SecurityContext, ThreadGroup};
use parking_lot::RwLock;
use std::panic;
use std::sync::Arc;

/// Capability set every authority supports.
///
/// Implementors override only the checks they care about; everything else
/// is forwarded to [`previous`](Authority::previous).
pub trait Authority: Send + Sync {
    /// The authority this one delegates to
    fn previous(&self) -> Option<&dyn Authority> {
        None
    }

    /// Authorize terminating the process with `status`.
    fn check_exit(&self, status: i32) -> Result<(), Error> {
        match self.previous() {
            Some(previous) => previous.check_exit(status),
            None => Ok(()),
        }
    }

    /// Authorize a non-termination operation.
    fn check(&self, operation: &Operation) -> Result<(), Error> {
        match self.previous() {
            Some(previous) => previous.check(operation),
            None => Ok(()),
        }
    }

    /// Whether a top-level window may be shown without a warning.
    fn check_top_level_window(&self, window: &str) -> bool {
        match self.previous() {
            Some(previous) => previous.check_top_level_window(window),
            None => true,
        }
    }

    /// Whether a check is currently in progress
    fn in_check(&self) -> bool {
        self.previous().is_some_and(|previous| previous.in_check())
    }

    fn security_context(&self) -> SecurityContext {
        match self.previous() {
            Some(previous) => previous.security_context(),
            None => SecurityContext::ambient(),
        }
    }

    /// Group new threads are attributed to
    fn thread_group(&self) -> ThreadGroup {
        match self.previous() {
            Some(previous) => previous.thread_group(),
            None => ThreadGroup::current(),
        }
    }
}

static CURRENT: RwLock<Option<Arc<dyn Authority>>> = parking_lot::const_rwlock(None);

/// The currently installed authority, if any.
pub fn authority() -> Option<Arc<dyn Authority>> {
    CURRENT.read().clone()
}

/// Install `authority` as current, returning the one it replaces.
pub fn set_authority(authority: Option<Arc<dyn Authority>>) -> Option<Arc<dyn Authority>> {
    std::mem::replace(&mut *CURRENT.write(), authority)
}

/// Ask the current authority to authorize `operation`.
///
/// Without an installed authority every operation is permitted.
pub fn check(operation: &Operation) -> Result<(), Error> {
    match authority() {
        Some(current) => {
            tracing::trace!(operation = operation.kind(), "checking operation");
            current.check(operation)
        }
        None => Ok(()),
    }
}

/// Terminate the process with `status`, unless the current authority objects.
///
/// An objection unwinds the calling thread instead: an intercepted
/// termination unwinds with a [`TerminationIntercepted`](crate::TerminationIntercepted)
/// payload, any other refusal with the [`Error`] itself.
pub fn exit(status: i32) -> ! {
    if let Some(current) = authority() {
        match current.check_exit(status) {
            Ok(()) => {}
            Err(Error::TerminationIntercepted(signal)) => {
                tracing::trace!(status, "termination intercepted");
                signal.raise()
            }
            Err(other) => panic::resume_unwind(Box::new(other)),
        }
    }
    std::process::exit(status)
}

#[cfg(test)]
#[path = "authority_tests.rs"]
mod tests;
