// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotest-ctrf-events: `go test -json` processing for gotest-ctrf
//!
//! This library crate decodes the event stream written by `go test -json`,
//! correlates it into a CTRF [`Report`](gotest_ctrf_schema::Report), and
//! optionally annotates test results with the Go source file that declares
//! them.
//!
//! # Example
//!
//! ```no_run
//! use gotest_ctrf_events::{FilenameIndex, parse_test_results};
//!
//! let input = std::io::stdin().lock();
//! let mut correlation = parse_test_results(input, None).unwrap();
//! FilenameIndex::scan(".").enrich(&mut correlation.report);
//! correlation.report.write_file("ctrf-report.json").unwrap();
//! ```

pub mod correlate;
pub mod decoder;
pub mod enrich;
pub mod error;
pub mod event;

pub use correlate::{
    Correlation, Correlator, EXTRA_BUILD_FAIL, EXTRA_BUILD_OUTPUT, EXTRA_FAILED_BUILD, TOOL_NAME,
    parse_test_results,
};
pub use decoder::{EventDecoder, decode_all};
pub use enrich::{FilenameIndex, enrich_report_with_filenames};
pub use error::{EventsError, TimestampError};
pub use event::{Action, TestEvent, TestId};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::correlate::{Correlation, Correlator, parse_test_results};
    pub use crate::decoder::EventDecoder;
    pub use crate::error::EventsError;
    pub use crate::event::{Action, TestEvent};
}
