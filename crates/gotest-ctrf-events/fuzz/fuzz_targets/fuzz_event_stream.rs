// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for event decoding and correlation
//!
//! Arbitrary bytes are fed to the correlator as a `go test -json` stream.
//! Decoding may fail, but whatever is produced must keep its counters
//! consistent.

#![no_main]

use libfuzzer_sys::fuzz_target;

use gotest_ctrf_events::parse_test_results;

fuzz_target!(|data: &[u8]| {
    if let Ok(correlation) = parse_test_results(data, None) {
        let summary = correlation.report.summary();
        assert!(summary.is_consistent());
        assert_eq!(summary.tests as usize, correlation.report.tests().len());
    }
});
