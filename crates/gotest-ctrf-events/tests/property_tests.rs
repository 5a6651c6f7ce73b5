// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for gotest-ctrf-events
//!
//! These tests use proptest to check that correlation keeps its counters,
//! time window and failure messages consistent for arbitrary event streams.

use proptest::prelude::*;

use gotest_ctrf_events::{Action, Correlator, TOOL_NAME, TestEvent, decode_all};
use gotest_ctrf_schema::Report;

const PKG: &str = "example.com/prop";
const TEST_NAMES: [&str; 4] = ["TestA", "TestA/sub", "TestB", ""];

// ============================================================================
// Strategies
// ============================================================================

fn arbitrary_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Start),
        Just(Action::Run),
        Just(Action::Pause),
        Just(Action::Cont),
        Just(Action::Pass),
        Just(Action::Fail),
        Just(Action::Skip),
        Just(Action::Output),
        Just(Action::Bench),
        Just(Action::Unknown),
    ]
}

/// Timestamps within one minute, plus a few malformed ones
fn arbitrary_time() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => (0u32..60, 0u32..1000).prop_map(|(s, ms)| format!("2025-03-02T10:00:{s:02}.{ms:03}Z")),
        1 => Just(String::new()),
        1 => Just("not a time".to_string()),
    ]
}

/// Events over a small set of tests, so runs and completions overlap
fn arbitrary_event() -> impl Strategy<Value = TestEvent> {
    (
        arbitrary_action(),
        0..TEST_NAMES.len(),
        arbitrary_time(),
        0.0f64..5.0,
        "[a-z ]{0,12}\n",
    )
        .prop_map(|(action, idx, time, elapsed, output)| {
            let event = TestEvent::new(action, PKG, TEST_NAMES[idx])
                .at(time)
                .elapsed(elapsed);
            if action == Action::Output {
                event.with_output(output)
            } else {
                event
            }
        })
}

fn correlate(events: &[TestEvent]) -> gotest_ctrf_events::Correlation {
    let mut correlator = Correlator::new(Report::starting_at(TOOL_NAME, None, i64::MAX));
    for event in events {
        correlator.observe(event.clone());
    }
    correlator.finish()
}

// ============================================================================
// Property Tests: Summary counters
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: one result per terminal test-level event, and the counters add up
    #[test]
    fn counters_match_terminal_events(events in prop::collection::vec(arbitrary_event(), 0..60)) {
        let correlation = correlate(&events);
        let summary = correlation.report.summary();

        let terminal = events
            .iter()
            .filter(|e| !e.is_package_level() && e.action.is_terminal())
            .count() as u64;

        prop_assert_eq!(summary.tests, terminal);
        prop_assert_eq!(correlation.report.tests().len() as u64, terminal);
        prop_assert!(summary.is_consistent());
        prop_assert_eq!(summary.pending, 0);
        prop_assert_eq!(summary.other, 0);
    }

    /// Property: every report produced by correlation validates
    #[test]
    fn correlated_reports_validate(events in prop::collection::vec(arbitrary_event(), 0..60)) {
        let correlation = correlate(&events);
        prop_assert!(correlation.report.validate().is_empty());
    }

    /// Property: only failed results carry a message
    #[test]
    fn messages_only_on_failures(events in prop::collection::vec(arbitrary_event(), 0..60)) {
        let correlation = correlate(&events);
        for test in correlation.report.tests() {
            if test.message.is_some() {
                prop_assert!(test.failed());
            }
        }
    }
}

// ============================================================================
// Property Tests: Time window
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: the window never inverts, whatever order timestamps arrive in
    #[test]
    fn window_start_never_after_stop(events in prop::collection::vec(arbitrary_event(), 0..60)) {
        let correlation = correlate(&events);
        let summary = correlation.report.summary();
        prop_assert!(summary.start <= summary.stop);
    }

    /// Property: bad timestamps are warned about exactly once each
    #[test]
    fn one_warning_per_untimed_completion(events in prop::collection::vec(arbitrary_event(), 0..60)) {
        let correlation = correlate(&events);
        let untimed = events
            .iter()
            .filter(|e| !e.is_package_level() && e.action.is_terminal())
            .filter(|e| e.time_millis().is_err())
            .count();
        prop_assert_eq!(correlation.timestamp_warnings.len(), untimed);
    }
}

// ============================================================================
// Property Tests: Failure messages
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: a parent's message never includes its subtest's output
    #[test]
    fn parent_message_excludes_subtest_output(
        child_lines in prop::collection::vec("child [a-z]{1,8}\n", 1..6),
        parent_lines in prop::collection::vec("parent [a-z]{1,8}\n", 0..4),
    ) {
        let mut events = vec![TestEvent::new(Action::Run, PKG, "TestA")];
        events.push(TestEvent::new(Action::Run, PKG, "TestA/sub"));
        for line in &child_lines {
            events.push(TestEvent::new(Action::Output, PKG, "TestA/sub").with_output(line.clone()));
        }
        events.push(TestEvent::new(Action::Fail, PKG, "TestA/sub"));
        for line in &parent_lines {
            events.push(TestEvent::new(Action::Output, PKG, "TestA").with_output(line.clone()));
        }
        events.push(TestEvent::new(Action::Fail, PKG, "TestA"));

        let correlation = correlate(&events);
        let tests = correlation.report.tests();
        prop_assert_eq!(tests.len(), 2);

        let child_message = tests[0].message.clone().unwrap_or_default();
        prop_assert_eq!(child_message, child_lines.concat());

        let parent_message = tests[1].message.clone().unwrap_or_default();
        prop_assert_eq!(&parent_message, &parent_lines.concat());
        prop_assert!(!parent_message.contains("child"));
    }
}

// ============================================================================
// Property Tests: Decoder
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: arbitrary input decodes or errors, never panics
    #[test]
    fn decoder_never_panics(input in ".{0,200}") {
        let _ = decode_all(input.as_bytes());
    }

    /// Property: serialized events decode back to the same events
    #[test]
    fn serialized_stream_decodes(events in prop::collection::vec(arbitrary_event(), 0..20)) {
        let mut stream = String::new();
        for event in &events {
            stream.push_str(&serde_json::to_string(event).expect("serialize"));
            stream.push('\n');
        }
        let decoded = decode_all(stream.as_bytes()).expect("own output decodes");
        prop_assert_eq!(decoded.len(), events.len());
        for (got, want) in decoded.iter().zip(&events) {
            prop_assert_eq!(got.action, want.action);
            prop_assert_eq!(&got.test, &want.test);
            prop_assert_eq!(&got.output, &want.output);
        }
    }
}
