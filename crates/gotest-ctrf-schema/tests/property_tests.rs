// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for gotest-ctrf-schema
//!
//! These tests use proptest to check that reports built through the public
//! API always validate, and that tampered documents are always rejected.

use proptest::prelude::*;

use gotest_ctrf_schema::{Report, TestResult, TestStatus, validate_document};

// ============================================================================
// Strategies
// ============================================================================

fn arbitrary_status() -> impl Strategy<Value = TestStatus> {
    prop::sample::select(TestStatus::ALL.to_vec())
}

fn arbitrary_result() -> impl Strategy<Value = TestResult> {
    (
        "Test[A-Z][a-zA-Z0-9_/]{0,20}",
        arbitrary_status(),
        0i64..100_000,
        prop::option::of("example\\.com/[a-z]{1,8}"),
        prop::option::of(".{0,40}"),
    )
        .prop_map(|(name, status, duration, suite, message)| {
            let mut result = TestResult::new(name, status, duration);
            if let Some(suite) = suite {
                result = result.with_suite(suite);
            }
            if let Some(message) = message {
                result = result.with_message(message);
            }
            result
        })
}

fn arbitrary_report() -> impl Strategy<Value = Report> {
    (prop::collection::vec(arbitrary_result(), 0..30), 0i64..2_000_000_000_000).prop_map(
        |(results, start)| {
            let mut report = Report::starting_at("gotest", None, start);
            for result in results {
                report.push_test(result);
            }
            report
        },
    )
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: pushing results keeps the summary consistent and valid
    #[test]
    fn pushed_results_keep_summary_consistent(report in arbitrary_report()) {
        let summary = report.summary();
        prop_assert!(summary.is_consistent());
        prop_assert_eq!(summary.tests as usize, report.tests().len());
        prop_assert!(report.validate().is_empty());
    }

    /// Property: a serialized report loads back unchanged
    #[test]
    fn serialized_report_loads_back(report in arbitrary_report()) {
        let json = report.to_json().expect("valid report serializes");
        let loaded = Report::from_json(&json).expect("own output loads");
        prop_assert_eq!(loaded, report);
    }

    /// Property: bumping one counter always yields an inconsistency error
    #[test]
    fn tampered_counter_is_rejected(report in arbitrary_report(), bump in 1u64..1000) {
        let json = report.to_json().expect("valid report serializes");
        let mut doc: serde_json::Value = serde_json::from_str(&json).expect("json");
        let tests = doc["results"]["summary"]["tests"].as_u64().unwrap_or_default();
        doc["results"]["summary"]["tests"] = serde_json::json!(tests + bump);

        let errors = validate_document(&doc);
        prop_assert_eq!(errors.len(), 1);
        let expected = format!(
            "inconsistent summary: tests is {} but status counters sum to {}",
            tests + bump,
            tests
        );
        prop_assert!(errors.contains_message(&expected));
    }
}
