// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! `go test -json` event types
//!
//! Each line written by `go test -json` (test2json) is one [`TestEvent`].
//! Field names on the wire are PascalCase and every field may be absent.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Action carried by a test event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// The test binary is about to be executed
    Start,
    /// A test has started running
    Run,
    /// A test has been paused
    Pause,
    /// A paused test has continued running
    Cont,
    /// A test passed
    Pass,
    /// A benchmark printed log output but did not fail
    Bench,
    /// A test or package failed
    Fail,
    /// Output printed by a test or package
    Output,
    /// A test was skipped or the package contained no tests
    Skip,
    /// Output printed by the compiler while building the package
    BuildOutput,
    /// The package failed to build
    BuildFail,
    /// Any action not listed above
    #[default]
    #[serde(other)]
    Unknown,
}

impl Action {
    /// True for actions that finalize a test's outcome
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Action::Pass | Action::Fail | Action::Skip)
    }
}

/// A single event from `go test -json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestEvent {
    /// RFC3339 timestamp with nanosecond precision
    #[serde(default)]
    pub time: String,
    /// What happened
    #[serde(default)]
    pub action: Action,
    /// Go package (the report's suite)
    #[serde(default)]
    pub package: String,
    /// Test name; empty for package-level events
    #[serde(default)]
    pub test: String,
    /// Elapsed seconds, set on terminal events
    #[serde(default)]
    pub elapsed: f64,
    /// Captured output text
    #[serde(default)]
    pub output: String,
    /// Package whose build failed (newer toolchains, on package `fail`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_build: Option<String>,
    /// Import path being built (newer toolchains, on build events)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,
}

impl TestEvent {
    /// Create an event with the given action, package and test
    #[must_use]
    pub fn new(action: Action, package: impl Into<String>, test: impl Into<String>) -> Self {
        Self {
            action,
            package: package.into(),
            test: test.into(),
            ..Self::default()
        }
    }

    /// Set the timestamp
    #[must_use]
    pub fn at(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    /// Set the elapsed seconds
    #[must_use]
    pub fn elapsed(mut self, seconds: f64) -> Self {
        self.elapsed = seconds;
        self
    }

    /// Set the output text
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// True for package-level events
    #[must_use]
    pub fn is_package_level(&self) -> bool {
        self.test.is_empty()
    }

    /// True when this event belongs to the given package and test
    #[must_use]
    pub fn belongs_to(&self, package: &str, test: &str) -> bool {
        self.package == package && self.test == test
    }

    /// Elapsed time in whole milliseconds, truncated toward zero
    #[must_use]
    pub fn elapsed_millis(&self) -> i64 {
        seconds_to_millis(self.elapsed)
    }

    /// Parse `Time` into epoch milliseconds
    ///
    /// # Errors
    ///
    /// Returns the chrono parse error if `Time` is not RFC3339.
    pub fn time_millis(&self) -> Result<i64, chrono::ParseError> {
        parse_time_millis(&self.time)
    }
}

/// Identity of a test: its package and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestId {
    /// Go package
    pub package: String,
    /// Test name, including any `/subtest` suffix
    pub name: String,
}

impl TestId {
    /// Identity of the test an event belongs to
    #[must_use]
    pub fn of(event: &TestEvent) -> Self {
        Self {
            package: event.package.clone(),
            name: event.test.clone(),
        }
    }

    /// True when `event` belongs to this test
    #[must_use]
    pub fn matches(&self, event: &TestEvent) -> bool {
        event.belongs_to(&self.package, &self.name)
    }
}

impl std::fmt::Display for TestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.package.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.package, self.name)
        }
    }
}

/// Convert seconds to whole milliseconds, truncating
#[must_use]
pub fn seconds_to_millis(seconds: f64) -> i64 {
    (seconds * 1000.0) as i64
}

/// Parse an RFC3339 timestamp (any precision, any offset) to epoch milliseconds
///
/// # Errors
///
/// Returns the chrono parse error for anything that is not RFC3339.
pub fn parse_time_millis(time: &str) -> Result<i64, chrono::ParseError> {
    DateTime::parse_from_rfc3339(time).map(|t| t.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_deserialize_full_event() {
        let json = r#"{"Time":"2025-03-02T01:08:01.832339962+01:00","Action":"pass","Package":"example.com/pkg","Test":"TestA","Elapsed":0.25}"#;
        let event: TestEvent = serde_json::from_str(json).expect("Should parse");
        assert_eq!(event.action, Action::Pass);
        assert_eq!(event.package, "example.com/pkg");
        assert_eq!(event.test, "TestA");
        assert_eq!(event.elapsed_millis(), 250);
        assert_eq!(event.output, "");
        assert!(event.action.is_terminal());
    }

    #[test]
    fn test_deserialize_sparse_event() {
        let event: TestEvent = serde_json::from_str("{}").expect("Should parse");
        assert_eq!(event, TestEvent::default());
        assert_eq!(event.action, Action::Unknown);
        assert!(event.is_package_level());
    }

    #[test]
    fn test_deserialize_build_actions() {
        let event: TestEvent =
            serde_json::from_str(r##"{"ImportPath":"example.com/pkg [example.com/pkg.test]","Action":"build-output","Output":"# example.com/pkg\n"}"##)
                .expect("Should parse");
        assert_eq!(event.action, Action::BuildOutput);
        assert_eq!(
            event.import_path.as_deref(),
            Some("example.com/pkg [example.com/pkg.test]")
        );

        let event: TestEvent =
            serde_json::from_str(r#"{"Action":"build-fail"}"#).expect("Should parse");
        assert_eq!(event.action, Action::BuildFail);
    }

    #[test]
    fn test_unknown_action_is_tolerated() {
        let event: TestEvent =
            serde_json::from_str(r#"{"Action":"attr","Test":"TestA"}"#).expect("Should parse");
        assert_eq!(event.action, Action::Unknown);
        assert!(!event.action.is_terminal());
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let event = TestEvent::new(Action::BuildFail, "example.com/pkg", "")
            .at("2025-03-02T01:08:01Z");
        let json = serde_json::to_string(&event).expect("serialize");
        assert_eq!(
            json,
            r#"{"Time":"2025-03-02T01:08:01Z","Action":"build-fail","Package":"example.com/pkg","Test":"","Elapsed":0.0,"Output":""}"#
        );
    }

    #[test]
    fn test_elapsed_truncates() {
        assert_eq!(TestEvent::default().elapsed(0.0019).elapsed_millis(), 1);
        assert_eq!(TestEvent::default().elapsed(1.9999).elapsed_millis(), 1999);
        assert_eq!(TestEvent::default().elapsed(0.0).elapsed_millis(), 0);
    }

    #[test]
    fn test_parse_time_millis() {
        assert_eq!(
            parse_time_millis("2025-03-02T01:08:01.832339962+01:00"),
            Ok(1_740_874_081_832)
        );
        assert_eq!(parse_time_millis("2025-03-02T00:08:01.832Z"), Ok(1_740_874_081_832));
        assert!(parse_time_millis("").is_err());
        assert!(parse_time_millis("yesterday").is_err());
    }

    #[test]
    fn test_test_id() {
        let event = TestEvent::new(Action::Run, "example.com/pkg", "TestA/sub");
        let id = TestId::of(&event);
        assert!(id.matches(&event));
        assert!(!id.matches(&TestEvent::new(Action::Run, "example.com/pkg", "TestA")));
        assert_eq!(id.to_string(), "example.com/pkg.TestA/sub");
    }
}
