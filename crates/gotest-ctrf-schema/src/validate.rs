// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Structural validation of CTRF reports
//!
//! Validation never stops at the first problem: every violation is collected
//! so callers can report them together. Two entry points share the same
//! messages:
//!
//! - [`Report::validate`] checks the typed model
//! - [`validate_document`] checks an arbitrary JSON document, which may be
//!   missing whole sections
//!
//! # Example
//!
//! ```
//! use gotest_ctrf_schema::{Report, validate_document};
//!
//! let report = Report::starting_at("gotest", None, 0);
//! assert!(report.validate().is_empty());
//!
//! let doc = serde_json::json!({ "results": { "tool": {} } });
//! let errors = validate_document(&doc);
//! assert!(errors.contains_message("missing property 'results.tool.name'"));
//! ```

use serde_json::{Map, Value};

use crate::error::{ValidationError, ValidationErrors};
use crate::report::{Report, TestStatus, status_sum};

const SUMMARY_COUNTERS: [&str; 6] = ["tests", "passed", "failed", "pending", "skipped", "other"];
const SUMMARY_TIMES: [&str; 2] = ["start", "stop"];

impl Report {
    /// Check the report against the schema's structural rules
    ///
    /// Returns an empty set when the report is valid. Never mutates the
    /// report.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        let results = &self.results;

        if results.tool.name.is_empty() {
            errors.push(ValidationError::missing("results.tool.name"));
        }

        let summary = &results.summary;
        if !summary.is_consistent() {
            errors.push(ValidationError::InconsistentSummary {
                tests: summary.tests,
                sum: summary.status_total(),
            });
        }

        for (i, test) in results.tests.iter().enumerate() {
            if test.name.is_empty() {
                errors.push(ValidationError::missing(format!("results.tests[{i}].name")));
            }
            if test.duration < 0 {
                errors.push(ValidationError::invalid(
                    format!("results.tests[{i}].duration"),
                    format!("must not be negative, got {}", test.duration),
                ));
            }
        }

        errors
    }
}

/// Check a JSON document against the schema's structural rules
#[must_use]
pub fn validate_document(doc: &Value) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    let Some(results) = doc.get("results").and_then(Value::as_object) else {
        errors.push(ValidationError::missing("results"));
        return errors;
    };

    match results.get("tool").and_then(Value::as_object) {
        None => errors.push(ValidationError::missing("results.tool")),
        Some(tool) => match tool.get("name") {
            Some(Value::String(name)) if !name.is_empty() => {}
            Some(Value::String(_)) | None | Some(Value::Null) => {
                errors.push(ValidationError::missing("results.tool.name"));
            }
            Some(_) => errors.push(ValidationError::invalid(
                "results.tool.name",
                "must be a string",
            )),
        },
    }

    match results.get("summary").and_then(Value::as_object) {
        None => errors.push(ValidationError::missing("results.summary")),
        Some(summary) => validate_summary(summary, &mut errors),
    }

    match results.get("tests") {
        None | Some(Value::Null) => errors.push(ValidationError::missing("results.tests")),
        Some(Value::Array(tests)) => {
            for (i, test) in tests.iter().enumerate() {
                validate_test(i, test, &mut errors);
            }
        }
        Some(_) => errors.push(ValidationError::invalid("results.tests", "must be an array")),
    }

    for key in ["environment", "extra"] {
        match results.get(key) {
            None | Some(Value::Object(_)) => {}
            Some(_) => errors.push(ValidationError::invalid(
                format!("results.{key}"),
                "must be an object",
            )),
        }
    }

    errors
}

fn validate_summary(summary: &Map<String, Value>, errors: &mut ValidationErrors) {
    let mut counters = [None; SUMMARY_COUNTERS.len()];

    for (slot, field) in counters.iter_mut().zip(SUMMARY_COUNTERS) {
        let path = format!("results.summary.{field}");
        match summary.get(field) {
            None | Some(Value::Null) => errors.push(ValidationError::missing(path)),
            Some(value) => match value.as_u64() {
                Some(n) => *slot = Some(n),
                None => errors.push(ValidationError::invalid(
                    path,
                    "must be a non-negative integer",
                )),
            },
        }
    }

    for field in SUMMARY_TIMES {
        let path = format!("results.summary.{field}");
        match summary.get(field) {
            None | Some(Value::Null) => errors.push(ValidationError::missing(path)),
            Some(value) if value.as_i64().is_none() => {
                errors.push(ValidationError::invalid(path, "must be an integer"));
            }
            Some(_) => {}
        }
    }

    if let [Some(tests), Some(passed), Some(failed), Some(pending), Some(skipped), Some(other)] =
        counters
    {
        let sum = status_sum([passed, failed, pending, skipped, other]);
        if u128::from(tests) != sum {
            errors.push(ValidationError::InconsistentSummary { tests, sum });
        }
    }
}

fn validate_test(index: usize, test: &Value, errors: &mut ValidationErrors) {
    let prefix = format!("results.tests[{index}]");
    let Some(test) = test.as_object() else {
        errors.push(ValidationError::invalid(prefix, "must be an object"));
        return;
    };

    match test.get("name") {
        Some(Value::String(name)) if !name.is_empty() => {}
        Some(Value::String(_)) | None | Some(Value::Null) => {
            errors.push(ValidationError::missing(format!("{prefix}.name")));
        }
        Some(_) => errors.push(ValidationError::invalid(
            format!("{prefix}.name"),
            "must be a string",
        )),
    }

    match test.get("status") {
        None | Some(Value::Null) => errors.push(ValidationError::missing(format!("{prefix}.status"))),
        Some(Value::String(status)) if TestStatus::from_str_opt(status).is_some() => {}
        Some(other) => errors.push(ValidationError::invalid(
            format!("{prefix}.status"),
            format!(
                "expected one of passed, failed, pending, skipped, other, got {other}"
            ),
        )),
    }

    match test.get("duration") {
        None | Some(Value::Null) => {
            errors.push(ValidationError::missing(format!("{prefix}.duration")));
        }
        Some(duration) => match duration.as_i64() {
            Some(ms) if ms >= 0 => {}
            Some(ms) => errors.push(ValidationError::invalid(
                format!("{prefix}.duration"),
                format!("must not be negative, got {ms}"),
            )),
            None => errors.push(ValidationError::invalid(
                format!("{prefix}.duration"),
                "must be an integer",
            )),
        },
    }

    for optional in ["suite", "filepath", "message"] {
        match test.get(optional) {
            None | Some(Value::String(_)) => {}
            Some(_) => errors.push(ValidationError::invalid(
                format!("{prefix}.{optional}"),
                "must be a string",
            )),
        }
    }
}
