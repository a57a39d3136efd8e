// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Authority that turns termination attempts into a catchable signal.

use crate::authority::{self, Authority};
use crate::error::{Error, TerminationIntercepted, EXIT_NOT_CALLED};
use crate::scope::{Entered, Scoped};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Intercepts every termination attempt and delegates all other checks to
/// the authority it replaced.
///
/// Only the status of the first attempt is kept; later attempts are still
/// intercepted but leave it unchanged.
pub struct ExitGuard {
    previous: Option<Arc<dyn Authority>>,
    first_status: Mutex<Option<i32>>,
}

impl ExitGuard {
    pub fn new(previous: Option<Arc<dyn Authority>>) -> Self {
        Self {
            previous,
            first_status: Mutex::new(None),
        }
    }

    /// Whether any termination attempt has been intercepted
    pub fn is_termination_requested(&self) -> bool {
        self.first_status.lock().is_some()
    }

    /// Status of the first intercepted termination attempt.
    ///
    /// Fails with [`Error::IllegalState`] before any attempt.
    pub fn first_termination_status(&self) -> Result<i32, Error> {
        self.first_status
            .lock()
            .ok_or(Error::IllegalState(EXIT_NOT_CALLED))
    }

    /// The authority this guard replaced
    pub fn delegate(&self) -> Option<&Arc<dyn Authority>> {
        self.previous.as_ref()
    }
}

impl Authority for ExitGuard {
    fn previous(&self) -> Option<&dyn Authority> {
        self.previous.as_deref()
    }

    fn check_exit(&self, status: i32) -> Result<(), Error> {
        let mut first = self.first_status.lock();
        if first.is_none() {
            *first = Some(status);
        }
        tracing::trace!(status, first = ?*first, "intercepting termination attempt");
        Err(TerminationIntercepted::new(status).into())
    }
}

impl fmt::Debug for ExitGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExitGuard")
            .field("has_previous", &self.previous.is_some())
            .field("first_status", &*self.first_status.lock())
            .finish()
    }
}

/// Scoped installation of an [`ExitGuard`] over the current authority.
///
/// A fresh guard wrapping whatever authority is current is created at each
/// install; restore puts that authority back.
#[derive(Default)]
pub struct ExitInterception {
    state: Mutex<Option<Installed>>,
    guard: Mutex<Option<Arc<ExitGuard>>>,
}

struct Installed {
    previous: Option<Arc<dyn Authority>>,
}

impl ExitInterception {
    pub fn new() -> Self {
        Self::default()
    }

    /// The guard from the most recent install
    pub fn guard(&self) -> Option<Arc<ExitGuard>> {
        self.guard.lock().clone()
    }

    pub fn is_installed(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Whether a termination attempt was intercepted during the last install
    pub fn is_termination_requested(&self) -> bool {
        self.guard()
            .is_some_and(|guard| guard.is_termination_requested())
    }

    /// Status of the first termination attempt during the last install.
    pub fn first_termination_status(&self) -> Result<i32, Error> {
        match self.guard() {
            Some(guard) => guard.first_termination_status(),
            None => Err(Error::IllegalState(EXIT_NOT_CALLED)),
        }
    }

    /// Install a fresh guard over the current authority.
    ///
    /// Returns `false` without doing anything when already installed.
    pub fn install(&self) -> bool {
        let mut state = self.state.lock();
        if state.is_some() {
            tracing::debug!("exit interception already installed");
            return false;
        }

        let previous = authority::authority();
        let guard = Arc::new(ExitGuard::new(previous.clone()));
        let current: Arc<dyn Authority> = guard.clone();
        authority::set_authority(Some(current));
        *self.guard.lock() = Some(guard);
        *state = Some(Installed { previous });
        tracing::debug!("installed exit guard");
        true
    }

    /// Put back the authority replaced by [`install`](Self::install)
    pub fn restore(&self) {
        if let Some(installed) = self.state.lock().take() {
            authority::set_authority(installed.previous);
            tracing::debug!("restored previous authority");
        }
    }
}

impl Scoped for ExitInterception {
    fn install(&self) -> Entered {
        Entered::Single(ExitInterception::install(self))
    }

    fn restore(&self, entered: Entered) {
        if entered.swapped() {
            ExitInterception::restore(self);
        }
    }
}

impl fmt::Debug for ExitInterception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExitInterception")
            .field("installed", &self.is_installed())
            .field("guard", &self.guard())
            .finish()
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
