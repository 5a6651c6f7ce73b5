// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The conversion pipeline behind the binary
//!
//! [`execute`] reads a `go test -json` stream, correlates it into a report,
//! annotates results with their source files, writes the report and prints
//! the console transcript. Whether the build or any test failed is returned
//! as an [`Outcome`], not as an error.
//!
//! # Example
//!
//! ```no_run
//! use gotest_ctrf::config::Config;
//! use gotest_ctrf::run::{Outcome, execute};
//!
//! let config = Config::default();
//! let input = std::fs::File::open("events.jsonl").expect("open");
//! let outcome = execute(&config, input, &mut std::io::stdout(), &mut std::io::stderr())
//!     .expect("convert");
//! assert_eq!(outcome, Outcome::Passed);
//! ```

use std::io::{Read, Write};

use gotest_ctrf_events::{Correlation, Correlator, EventDecoder, EventsError, FilenameIndex};
use gotest_ctrf_schema::SchemaError;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that stop a conversion
#[derive(Debug, Error)]
pub enum RunError {
    /// The event stream could not be decoded
    #[error(transparent)]
    Events(#[from] EventsError),

    /// The report could not be validated or written
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Writing to the console failed
    #[error("failed to write console output: {0}")]
    Console(#[from] std::io::Error),
}

// ============================================================================
// Outcome
// ============================================================================

/// Result of a completed conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every test passed or was skipped
    Passed,
    /// A test failed, a package failed, or the build failed
    BuildFailed,
}

impl Outcome {
    /// Outcome for a finished correlation
    #[must_use]
    pub fn of(correlation: &Correlation) -> Self {
        if correlation.build_failed() {
            Outcome::BuildFailed
        } else {
            Outcome::Passed
        }
    }

    /// Process exit code for this outcome
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Passed => 0,
            Outcome::BuildFailed => 1,
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Convert the event stream in `input` according to `config`
///
/// Echoed test output and the console transcript go to `stdout`, or to
/// `stderr` when the report itself is written to stdout.
///
/// # Errors
///
/// Returns `RunError::Events` on malformed input (no report is written),
/// `RunError::Schema` if the report is invalid or cannot be written, and
/// `RunError::Console` if console output fails.
pub fn execute<R, O, E>(
    config: &Config,
    input: R,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<Outcome, RunError>
where
    R: Read,
    O: Write,
    E: Write,
{
    let mut correlation = correlate(config, input, console(config, &mut *stdout, &mut *stderr))?;

    if !correlation.timestamp_warnings.is_empty() {
        warn!(
            count = correlation.timestamp_warnings.len(),
            "some tests were excluded from the run time window"
        );
    }

    if config.no_enrich {
        debug!("skipping source file enrichment");
    } else {
        let annotated = FilenameIndex::scan(&config.source_root).enrich(&mut correlation.report);
        debug!(annotated, root = %config.source_root.display(), "annotated test results");
    }

    let report = &correlation.report;
    if config.writes_to_stdout() {
        report.write(&mut *stdout, true)?;
    } else {
        report.write_file(&config.output)?;
        info!(
            path = %config.output.display(),
            tests = report.summary().tests,
            "successfully written ctrf json"
        );
    }

    if !config.verbose && !config.quiet {
        let sink = console(config, &mut *stdout, &mut *stderr);
        sink.write_all(correlation.console_output.as_bytes())?;
        sink.flush()?;
    }

    Ok(Outcome::of(&correlation))
}

/// Where echoed output and the transcript go
fn console<'w>(
    config: &Config,
    stdout: &'w mut dyn Write,
    stderr: &'w mut dyn Write,
) -> &'w mut dyn Write {
    if config.writes_to_stdout() {
        stderr
    } else {
        stdout
    }
}

fn correlate<R: Read>(
    config: &Config,
    input: R,
    console: &mut dyn Write,
) -> Result<Correlation, EventsError> {
    let mut correlator = Correlator::for_gotest(config.environment());
    if config.effective_verbose() {
        correlator = correlator.with_echo(console);
    }
    correlator.consume(EventDecoder::new(input))?;
    Ok(correlator.finish())
}
