// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capture configuration errors.

use thiserror::Error;

/// Message carried by [`CaptureError::InvalidConfiguration`] when no log mode was supplied.
pub const MISSING_LOG_MODE: &str = "The LogMode is missing.";

/// Errors that can occur when configuring a stream capture.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("{0}")]
    InvalidConfiguration(String),

    #[error("Failed to parse capture spec: {0}")]
    Parse(String),
}

impl CaptureError {
    pub(crate) fn missing_log_mode() -> Self {
        Self::InvalidConfiguration(MISSING_LOG_MODE.to_string())
    }
}
