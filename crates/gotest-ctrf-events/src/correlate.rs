// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Correlation of test events into a CTRF report
//!
//! The [`Correlator`] folds a stream of [`TestEvent`]s into a [`Report`]:
//!
//! - terminal events (`pass`, `fail`, `skip`) become test results and bump
//!   the summary counters
//! - a failing test's message is the output captured in the run of events
//!   immediately preceding the failure that belong to the same test, so a
//!   parent test never picks up its subtests' output
//! - package-level output and build output are kept as a console transcript
//! - build failures are recorded in the report's `extra` bag, and a
//!   `build-fail` stops any further correlation
//!
//! # Example
//!
//! ```
//! use gotest_ctrf_events::parse_test_results;
//!
//! let input = r#"{"Time":"2025-03-02T01:08:01.83Z","Action":"pass","Package":"p","Test":"TestA","Elapsed":0.5}"#;
//! let correlation = parse_test_results(input.as_bytes(), None).unwrap();
//! assert_eq!(correlation.report.summary().passed, 1);
//! assert!(!correlation.build_failed());
//! ```

use std::io::{Read, Write};

use gotest_ctrf_schema::{Environment, Report, TestResult, TestStatus};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::decoder::EventDecoder;
use crate::error::{EventsError, TimestampError};
use crate::event::{Action, TestEvent, TestId};

/// Tool name recorded in reports built from `go test -json`
pub const TOOL_NAME: &str = "gotest";

/// `extra` key set when a package-level `fail` is seen
pub const EXTRA_FAILED_BUILD: &str = "FailedBuild";
/// `extra` key holding the `build-fail` event
pub const EXTRA_BUILD_FAIL: &str = "buildFail";
/// `extra` key holding every `build-output` event
pub const EXTRA_BUILD_OUTPUT: &str = "buildOutput";

/// The contiguous stretch of events that share one (package, test) key
///
/// Any event with a different key ends the run. Output events extend it,
/// other events of the same key (`run`, `pause`, ...) leave it untouched.
#[derive(Debug, Default)]
struct OutputRun {
    owner: Option<TestId>,
    chunks: Vec<String>,
}

impl OutputRun {
    fn observe(&mut self, event: &TestEvent) {
        let same_owner = self.owner.as_ref().is_some_and(|id| id.matches(event));
        if !same_owner {
            self.owner = Some(TestId::of(event));
            self.chunks.clear();
        }
        if event.action == Action::Output {
            self.chunks.push(event.output.clone());
        }
    }

    /// Concatenated output of the run, if `event` belongs to it
    fn message_for(&self, event: &TestEvent) -> String {
        match &self.owner {
            Some(id) if id.matches(event) => self.chunks.concat(),
            _ => String::new(),
        }
    }
}

/// Folds test events into a [`Report`]
pub struct Correlator<'a> {
    report: Report,
    run: OutputRun,
    open: Vec<TestId>,
    console: String,
    warnings: Vec<TimestampError>,
    echo: Option<&'a mut dyn Write>,
    timed: bool,
    halted: bool,
    events_seen: usize,
}

impl<'a> Correlator<'a> {
    /// Create a correlator that fills in `report`
    #[must_use]
    pub fn new(report: Report) -> Self {
        Self {
            report,
            run: OutputRun::default(),
            open: Vec::new(),
            console: String::new(),
            warnings: Vec::new(),
            echo: None,
            timed: false,
            halted: false,
            events_seen: 0,
        }
    }

    /// Create a correlator for a fresh `gotest` report
    #[must_use]
    pub fn for_gotest(environment: Option<Environment>) -> Self {
        Self::new(Report::new(TOOL_NAME, environment))
    }

    /// Echo the text of every output and build-output event to `sink`
    #[must_use]
    pub fn with_echo(mut self, sink: &'a mut dyn Write) -> Self {
        self.echo = Some(sink);
        self
    }

    /// The report built so far
    #[must_use]
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// True once a `build-fail` has stopped correlation
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// The most recently started test that has not finished
    #[must_use]
    pub fn innermost_open_test(&self) -> Option<&TestId> {
        self.open.last()
    }

    /// Process every event from `events`
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error yielded by `events`.
    pub fn consume<I>(&mut self, events: I) -> Result<(), EventsError>
    where
        I: IntoIterator<Item = Result<TestEvent, EventsError>>,
    {
        for event in events {
            self.observe(event?);
        }
        Ok(())
    }

    /// Process a single event
    pub fn observe(&mut self, event: TestEvent) {
        self.events_seen += 1;
        self.echo(&event);

        if self.halted {
            return;
        }
        self.run.observe(&event);

        match event.action {
            Action::BuildOutput => {
                self.console.push_str(&event.output);
                self.append_extra(EXTRA_BUILD_OUTPUT, &event);
                return;
            }
            Action::BuildFail => {
                warn!(package = %event.package, "build failed, ignoring remaining test events");
                self.append_extra(EXTRA_BUILD_FAIL, &event);
                self.halted = true;
                return;
            }
            Action::Fail if event.is_package_level() => {
                debug!(package = %event.package, "package failed");
                self.report
                    .extra_mut()
                    .entry(EXTRA_FAILED_BUILD)
                    .or_insert(Value::Bool(true));
            }
            Action::Output if event.is_package_level() => {
                self.console.push_str(&event.output);
            }
            _ => {}
        }

        if event.is_package_level() {
            return;
        }

        match event.action {
            Action::Run | Action::Cont => self.open_test(&event),
            Action::Pass => self.complete(event, TestStatus::Passed),
            Action::Fail => self.complete(event, TestStatus::Failed),
            Action::Skip => self.complete(event, TestStatus::Skipped),
            _ => {}
        }
    }

    /// Finish correlation and hand back the report
    #[must_use]
    pub fn finish(self) -> Correlation {
        let summary = self.report.summary();
        info!(
            events = self.events_seen,
            tests = summary.tests,
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            "correlated test events"
        );
        for id in &self.open {
            debug!(test = %id, "test never finished");
        }

        Correlation {
            report: self.report,
            console_output: self.console,
            timestamp_warnings: self.warnings,
            unfinished: self.open,
            halted: self.halted,
        }
    }

    fn echo(&mut self, event: &TestEvent) {
        if !matches!(event.action, Action::Output | Action::BuildOutput) {
            return;
        }
        if let Some(sink) = self.echo.as_mut()
            && let Err(e) = sink.write_all(event.output.as_bytes())
        {
            warn!(error = %e, "failed to echo test output");
        }
    }

    fn open_test(&mut self, event: &TestEvent) {
        if !self.open.iter().any(|id| id.matches(event)) {
            self.open.push(TestId::of(event));
        }
    }

    fn complete(&mut self, event: TestEvent, status: TestStatus) {
        let duration = event.elapsed_millis();

        match event.time_millis() {
            Ok(start) => self.widen_window(start, start.saturating_add(duration)),
            Err(source) => {
                let warning = TimestampError {
                    value: event.time.clone(),
                    package: event.package.clone(),
                    test: event.test.clone(),
                    source,
                };
                warn!(%warning, "excluding test from run time window");
                self.warnings.push(warning);
            }
        }

        if let Some(pos) = self.open.iter().rposition(|id| id.matches(&event)) {
            self.open.remove(pos);
        }

        let message = if status == TestStatus::Failed {
            self.run.message_for(&event)
        } else {
            String::new()
        };

        debug!(package = %event.package, test = %event.test, ?status, duration, "test finished");
        self.report.push_test(
            TestResult::new(event.test, status, duration)
                .with_suite(event.package)
                .with_message(message),
        );
    }

    fn widen_window(&mut self, start: i64, end: i64) {
        let summary = &mut self.report.results.summary;
        summary.start = summary.start.min(start);
        summary.stop = if self.timed {
            summary.stop.max(end)
        } else {
            end
        };
        self.timed = true;
    }

    fn append_extra(&mut self, key: &str, event: &TestEvent) {
        let value = match serde_json::to_value(event) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, key, "failed to record build event");
                return;
            }
        };
        let slot = self
            .report
            .extra_mut()
            .entry(key)
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(events) = slot {
            events.push(value);
        }
    }
}

/// Everything produced by correlating one event stream
#[derive(Debug)]
pub struct Correlation {
    /// The populated report
    pub report: Report,
    /// Package-level and build output, in stream order
    pub console_output: String,
    /// Events left out of the time window because of a bad timestamp
    pub timestamp_warnings: Vec<TimestampError>,
    /// Tests that started but never reached a terminal event
    pub unfinished: Vec<TestId>,
    /// True when a `build-fail` stopped correlation
    pub halted: bool,
}

impl Correlation {
    /// True when any test failed or the build failed
    #[must_use]
    pub fn build_failed(&self) -> bool {
        self.report.summary().failed > 0
            || self.report.extra(EXTRA_FAILED_BUILD).is_some()
            || self.report.extra(EXTRA_BUILD_FAIL).is_some()
    }
}

/// Decode and correlate a whole `go test -json` stream
///
/// # Errors
///
/// Returns the first decode or read error; no partial report is returned.
pub fn parse_test_results<R: Read>(
    reader: R,
    environment: Option<Environment>,
) -> Result<Correlation, EventsError> {
    let mut correlator = Correlator::for_gotest(environment);
    correlator.consume(EventDecoder::new(reader))?;
    Ok(correlator.finish())
}
