// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gotest-ctrf-events

use thiserror::Error;

/// Errors that abort processing of an event stream
#[derive(Debug, Error)]
pub enum EventsError {
    /// A line of the stream is not a well-formed test event
    #[error("malformed test event: {0}")]
    Decode(#[source] serde_json::Error),

    /// Error reading the event stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for EventsError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Io(err.into())
        } else {
            Self::Decode(err)
        }
    }
}

/// A test event whose `Time` field could not be parsed
///
/// This is recovered locally: the event still produces a test result but is
/// left out of the run's time window.
#[derive(Debug, Clone, Error)]
#[error("invalid timestamp '{value}' on {package} {test}: {source}")]
pub struct TimestampError {
    /// The raw `Time` value
    pub value: String,
    /// Package of the offending event
    pub package: String,
    /// Test name of the offending event
    pub test: String,
    /// Underlying parse failure
    #[source]
    pub source: chrono::ParseError,
}
