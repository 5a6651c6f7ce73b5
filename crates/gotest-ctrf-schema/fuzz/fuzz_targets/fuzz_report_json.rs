// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for report loading and validation
//!
//! Any document accepted by `Report::from_json` must serialize again, and
//! validation of arbitrary JSON must never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;

use gotest_ctrf_schema::{Report, validate_document};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(input) {
            let _ = validate_document(&value);
        }

        if let Ok(report) = Report::from_json(input) {
            let _ = report.to_json();
        }
    }
});
