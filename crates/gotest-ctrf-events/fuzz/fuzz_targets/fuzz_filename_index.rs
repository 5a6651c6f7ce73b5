// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for Go test identifier lookup

#![no_main]

use libfuzzer_sys::fuzz_target;

use gotest_ctrf_events::FilenameIndex;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let (source, name) = input.split_once('\0').unwrap_or((input, "TestFuzz"));
        let index = FilenameIndex::from_sources([("fuzz_test.go", source)]);
        let _ = index.lookup(name);
    }
});
