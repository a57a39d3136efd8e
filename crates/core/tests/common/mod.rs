// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared fixtures for integration tests.

use parking_lot::Mutex;
use stdguard::{Authority, Denied, Error, Operation};

/// Authority that records every check it sees and denies the ones listed.
#[derive(Default)]
pub struct RecordingAuthority {
    seen: Mutex<Vec<Operation>>,
    denied_kinds: Vec<&'static str>,
}

impl RecordingAuthority {
    pub fn denying(kinds: &[&'static str]) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            denied_kinds: kinds.to_vec(),
        }
    }

    pub fn seen(&self) -> Vec<Operation> {
        self.seen.lock().clone()
    }
}

impl Authority for RecordingAuthority {
    fn check(&self, operation: &Operation) -> Result<(), Error> {
        self.seen.lock().push(operation.clone());
        if self.denied_kinds.contains(&operation.kind()) {
            return Err(Denied::new(operation.to_string(), "denied by fixture").into());
        }
        Ok(())
    }
}

/// Route tracing output through the test harness so it is shown on failure.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
