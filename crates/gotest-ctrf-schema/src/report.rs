// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! CTRF report model and serialization
//!
//! The document layout follows the Common Test Report Format: a single
//! `results` object holding the tool, a summary, the ordered test list and
//! optional environment and extra metadata. Optional fields are omitted from
//! the JSON output rather than written as `null`.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::SchemaError;
use crate::validate::validate_document;

/// Root of a CTRF document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The `results` object
    pub results: Results,
}

/// Contents of the `results` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Results {
    /// Tool that produced the results
    pub tool: Tool,
    /// Aggregated counters and time window
    pub summary: Summary,
    /// Test results in completion order
    pub tests: Vec<TestResult>,
    /// Caller-supplied environment metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    /// Free-form metadata (build failure details)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
}

/// The tool that produced a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name, e.g. `gotest`
    pub name: String,
}

/// Summary counters and the run's time window
///
/// `tests` always equals the sum of the five status counters when results
/// are added through [`Report::push_test`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Total number of tests
    pub tests: u64,
    /// Tests that passed
    pub passed: u64,
    /// Tests that failed
    pub failed: u64,
    /// Tests still pending
    pub pending: u64,
    /// Tests that were skipped
    pub skipped: u64,
    /// Tests with any other outcome
    pub other: u64,
    /// Start of the run, epoch milliseconds
    pub start: i64,
    /// End of the run, epoch milliseconds
    pub stop: i64,
}

impl Summary {
    /// Create a zeroed summary whose window is anchored at `start_ms`
    #[must_use]
    pub fn starting_at(start_ms: i64) -> Self {
        Self {
            start: start_ms,
            stop: start_ms,
            ..Self::default()
        }
    }

    /// Count one more test with the given status
    pub fn record(&mut self, status: TestStatus) {
        self.tests += 1;
        match status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => self.failed += 1,
            TestStatus::Pending => self.pending += 1,
            TestStatus::Skipped => self.skipped += 1,
            TestStatus::Other => self.other += 1,
        }
    }

    /// Sum of the per-status counters
    ///
    /// Widened so counters loaded from a document cannot overflow.
    #[must_use]
    pub fn status_total(&self) -> u128 {
        status_sum([self.passed, self.failed, self.pending, self.skipped, self.other])
    }

    /// Check the `tests` counter against the per-status counters
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        u128::from(self.tests) == self.status_total()
    }
}

pub(crate) fn status_sum(counters: [u64; 5]) -> u128 {
    counters.into_iter().map(u128::from).sum()
}

/// Status of a single test, serialized in lowercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Test passed
    Passed,
    /// Test failed
    Failed,
    /// Test has not completed
    Pending,
    /// Test was skipped
    Skipped,
    /// Any other outcome
    Other,
}

impl TestStatus {
    /// All statuses accepted by the schema
    pub const ALL: [TestStatus; 5] = [
        TestStatus::Passed,
        TestStatus::Failed,
        TestStatus::Pending,
        TestStatus::Skipped,
        TestStatus::Other,
    ];

    /// Schema spelling of the status
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Pending => "pending",
            TestStatus::Skipped => "skipped",
            TestStatus::Other => "other",
        }
    }

    /// Parse the schema spelling of a status
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

/// Result of a single test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test name
    pub name: String,
    /// Test outcome
    pub status: TestStatus,
    /// Duration in milliseconds
    pub duration: i64,
    /// Suite (Go package) the test belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suite: Option<String>,
    /// Source file the test was found in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    /// Failure message (captured output)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TestResult {
    /// Create a result with no suite, file or message
    #[must_use]
    pub fn new(name: impl Into<String>, status: TestStatus, duration: i64) -> Self {
        Self {
            name: name.into(),
            status,
            duration,
            suite: None,
            filepath: None,
            message: None,
        }
    }

    /// Set the suite, ignoring empty names
    #[must_use]
    pub fn with_suite(mut self, suite: impl Into<String>) -> Self {
        self.suite = Some(suite.into()).filter(|s| !s.is_empty());
        self
    }

    /// Set the failure message, ignoring empty messages
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into()).filter(|m| !m.is_empty());
        self
    }

    /// Check if the test passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == TestStatus::Passed
    }

    /// Check if the test failed
    #[must_use]
    pub fn failed(&self) -> bool {
        self.status == TestStatus::Failed
    }
}

/// Environment metadata supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Name of the application under test
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// Version of the application under test
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    /// Operating system platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_platform: Option<String>,
    /// Operating system release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_release: Option<String>,
    /// Operating system version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    /// Build name, e.g. a branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_name: Option<String>,
    /// Build number or identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<String>,
}

impl Environment {
    /// True when no field carries a non-empty value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.app_name,
            &self.app_version,
            &self.os_platform,
            &self.os_release,
            &self.os_version,
            &self.build_name,
            &self.build_number,
        ]
        .into_iter()
        .all(|field| field.as_deref().is_none_or(str::is_empty))
    }

    /// `None` when empty, otherwise the environment with empty fields dropped
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        fn keep(field: Option<String>) -> Option<String> {
            field.filter(|v| !v.is_empty())
        }

        if self.is_empty() {
            return None;
        }
        Some(Self {
            app_name: keep(self.app_name),
            app_version: keep(self.app_version),
            os_platform: keep(self.os_platform),
            os_release: keep(self.os_release),
            os_version: keep(self.os_version),
            build_name: keep(self.build_name),
            build_number: keep(self.build_number),
        })
    }
}

impl Report {
    /// Create an empty report whose time window starts now
    #[must_use]
    pub fn new(tool_name: impl Into<String>, environment: Option<Environment>) -> Self {
        Self::starting_at(tool_name, environment, Utc::now().timestamp_millis())
    }

    /// Create an empty report whose time window starts at `start_ms`
    #[must_use]
    pub fn starting_at(
        tool_name: impl Into<String>,
        environment: Option<Environment>,
        start_ms: i64,
    ) -> Self {
        Self {
            results: Results {
                tool: Tool {
                    name: tool_name.into(),
                },
                summary: Summary::starting_at(start_ms),
                tests: Vec::new(),
                environment: environment.and_then(Environment::non_empty),
                extra: None,
            },
        }
    }

    /// Append a test result and update the summary counters
    pub fn push_test(&mut self, result: TestResult) {
        self.results.summary.record(result.status);
        self.results.tests.push(result);
    }

    /// Summary counters
    #[must_use]
    pub fn summary(&self) -> &Summary {
        &self.results.summary
    }

    /// Test results in completion order
    #[must_use]
    pub fn tests(&self) -> &[TestResult] {
        &self.results.tests
    }

    /// Failed test results
    #[must_use]
    pub fn failing_tests(&self) -> Vec<&TestResult> {
        self.results.tests.iter().filter(|t| t.failed()).collect()
    }

    /// The extra metadata bag, created on first use
    pub fn extra_mut(&mut self) -> &mut Map<String, Value> {
        self.results.extra.get_or_insert_with(Map::new)
    }

    /// Look up a key in the extra metadata bag
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.results.extra.as_ref().and_then(|extra| extra.get(key))
    }

    /// Serialize to compact JSON after validating
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidReport` if validation fails.
    pub fn to_json(&self) -> Result<String, SchemaError> {
        self.ensure_valid()?;
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to two-space indented JSON with a trailing newline
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidReport` if validation fails.
    pub fn to_json_pretty(&self) -> Result<String, SchemaError> {
        self.ensure_valid()?;
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the report to `writer`, followed by a newline
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidReport` if validation fails, or an IO
    /// error if the writer fails.
    pub fn write<W: Write>(&self, mut writer: W, pretty: bool) -> Result<(), SchemaError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            let mut json = self.to_json()?;
            json.push('\n');
            json
        };
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Write the report as pretty JSON to `path`
    ///
    /// The document is written to a sibling temporary file and renamed into
    /// place, so an invalid report or a failed write leaves no file at
    /// `path`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidReport` if validation fails, or an IO
    /// error if the file cannot be written.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), SchemaError> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;

        let tmp_path = path.with_extension("json.tmp");
        let written = fs::File::create(&tmp_path).and_then(|mut file| {
            file.write_all(json.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&tmp_path, path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        debug!(path = %path.display(), bytes = json.len(), "wrote report");
        Ok(())
    }

    /// Parse and validate a CTRF document
    ///
    /// Structural problems are reported as validation errors, all at once,
    /// rather than as the first serde error encountered.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Json` if the text is not JSON, or
    /// `SchemaError::InvalidReport` if the document violates the schema.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(json)?;
        validate_document(&value)
            .into_result()
            .map_err(SchemaError::InvalidReport)?;
        Ok(serde_json::from_value(value)?)
    }

    fn ensure_valid(&self) -> Result<(), SchemaError> {
        self.validate()
            .into_result()
            .map_err(SchemaError::InvalidReport)
    }
}
