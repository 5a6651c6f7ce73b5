// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotest-ctrf-schema: CTRF report model for gotest-ctrf
//!
//! This library crate provides the Common Test Report Format document model,
//! its structural validation, and serialization to JSON text and files.
//! Every serialization path validates first and refuses invalid reports.
//!
//! # Example
//!
//! ```no_run
//! use gotest_ctrf_schema::{Report, TestResult, TestStatus};
//!
//! let mut report = Report::new("gotest", None);
//! report.push_test(TestResult::new("TestAdd", TestStatus::Passed, 3));
//!
//! assert!(report.validate().is_empty());
//! report.write_file("ctrf-report.json").unwrap();
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod report;
pub mod validate;

pub use error::{SchemaError, ValidationError, ValidationErrors};
pub use report::{Environment, Report, Results, Summary, TestResult, TestStatus, Tool};
pub use validate::validate_document;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{SchemaError, ValidationErrors};
    pub use crate::report::{Environment, Report, TestResult, TestStatus};
}
