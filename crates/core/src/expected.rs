// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rule for tests that expect (or forbid) the code under test to exit.

use crate::error::{Error, TerminationIntercepted};
use crate::guard::ExitInterception;
use crate::scope::run_scoped;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Expectation {
    NoExit,
    AnyStatus,
    Status(i32),
}

type Assertion = Box<dyn Fn() -> Result<(), Error>>;

/// Verifies how a test body terminates.
///
/// ```ignore
/// ExpectedExit::none()
///     .expect_exit_with_status(2)
///     .check_after_exit(|| Ok(()))
///     .run(|| stdguard::exit(2))?;
/// ```
pub struct ExpectedExit {
    expectation: Expectation,
    interception: ExitInterception,
    assertions: Vec<Assertion>,
}

impl ExpectedExit {
    /// Expect the body not to exit
    pub fn none() -> Self {
        Self {
            expectation: Expectation::NoExit,
            interception: ExitInterception::new(),
            assertions: Vec::new(),
        }
    }

    /// Expect an exit with any status
    pub fn expect_exit(mut self) -> Self {
        self.expectation = Expectation::AnyStatus;
        self
    }

    /// Expect an exit with exactly `status`
    pub fn expect_exit_with_status(mut self, status: i32) -> Self {
        self.expectation = Expectation::Status(status);
        self
    }

    /// Run `assertion` once the exit has been verified
    pub fn check_after_exit<F>(mut self, assertion: F) -> Self
    where
        F: Fn() -> Result<(), Error> + 'static,
    {
        self.assertions.push(Box::new(assertion));
        self
    }

    /// Whether the last run intercepted a termination attempt
    pub fn is_termination_requested(&self) -> bool {
        self.interception.is_termination_requested()
    }

    /// Run `body` with termination intercepted and verify the expectation.
    ///
    /// Panics from `body` other than an intercepted termination resume after
    /// the previous authority has been restored.
    pub fn run<F: FnOnce()>(&self, body: F) -> Result<(), Error> {
        let outcome = run_scoped(&self.interception, || {
            panic::catch_unwind(AssertUnwindSafe(body))
        });

        if let Err(payload) = outcome {
            if TerminationIntercepted::from_panic(&*payload).is_none() {
                panic::resume_unwind(payload);
            }
        }

        self.verify()
    }

    fn verify(&self) -> Result<(), Error> {
        let status = match self.interception.first_termination_status() {
            Ok(status) => Some(status),
            Err(Error::IllegalState(_)) => None,
            Err(other) => return Err(other),
        };

        match (self.expectation, status) {
            (Expectation::NoExit, None) => Ok(()),
            (Expectation::NoExit, Some(status)) => Err(Error::UnexpectedExit { status }),
            (_, None) => Err(Error::ExitNotCalled),
            (Expectation::Status(expected), Some(actual)) if expected != actual => {
                Err(Error::UnexpectedExitStatus { expected, actual })
            }
            (_, Some(_)) => {
                for assertion in &self.assertions {
                    assertion()?;
                }
                Ok(())
            }
        }
    }
}

impl Default for ExpectedExit {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for ExpectedExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectedExit")
            .field("expectation", &self.expectation)
            .field("interception", &self.interception)
            .field("assertions", &self.assertions.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "expected_tests.rs"]
mod tests;
