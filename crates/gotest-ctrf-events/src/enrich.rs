// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Source file enrichment
//!
//! Scans `*_test.go` files under a root directory for test function names
//! and records, on each test result, the file that declares it. This is
//! advisory metadata: it never changes counters or validation.

use std::path::Path;

use gotest_ctrf_schema::Report;
use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

/// Suffix of Go test source files
pub const TEST_FILE_SUFFIX: &str = "_test.go";

const TEST_IDENT_PATTERN: &str = r"Test.\w+";

/// Test identifiers found in each Go test file, in path order
#[derive(Debug, Clone, Default)]
pub struct FilenameIndex {
    files: Vec<(String, Vec<String>)>,
}

impl FilenameIndex {
    /// Scan every `*_test.go` file below `root`
    ///
    /// Unreadable entries are skipped. Paths are recorded relative to
    /// `root`.
    #[must_use]
    pub fn scan(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let pattern = test_ident_regex();

        let files = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(error = %e, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry.file_name().to_string_lossy().ends_with(TEST_FILE_SUFFIX)
            })
            .filter_map(|entry| {
                let source = match std::fs::read_to_string(entry.path()) {
                    Ok(source) => source,
                    Err(e) => {
                        debug!(path = %entry.path().display(), error = %e, "skipping test file");
                        return None;
                    }
                };
                let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
                Some((
                    relative.to_string_lossy().into_owned(),
                    find_test_idents(&pattern, &source),
                ))
            })
            .collect::<Vec<_>>();

        debug!(root = %root.display(), files = files.len(), "indexed Go test files");
        Self { files }
    }

    /// Build an index from in-memory `(path, source)` pairs, kept in the given order
    #[must_use]
    pub fn from_sources<I, P, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<String>,
        S: AsRef<str>,
    {
        let pattern = test_ident_regex();
        let files = sources
            .into_iter()
            .map(|(path, source)| (path.into(), find_test_idents(&pattern, source.as_ref())))
            .collect();
        Self { files }
    }

    /// Number of indexed files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when no test file was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The last file declaring an identifier contained in `test_name`
    #[must_use]
    pub fn lookup(&self, test_name: &str) -> Option<&str> {
        self.files
            .iter()
            .rev()
            .find(|(_, idents)| idents.iter().any(|ident| test_name.contains(ident.as_str())))
            .map(|(path, _)| path.as_str())
    }

    /// Set `filepath` on every test result with a match
    ///
    /// Returns the number of results annotated. Results without a match
    /// keep whatever `filepath` they had.
    pub fn enrich(&self, report: &mut Report) -> usize {
        if self.is_empty() {
            return 0;
        }
        let mut annotated = 0;
        for test in &mut report.results.tests {
            if let Some(path) = self.lookup(&test.name) {
                test.filepath = Some(path.to_string());
                annotated += 1;
            }
        }
        debug!(annotated, total = report.results.tests.len(), "enriched test results");
        annotated
    }
}

/// Scan `root` and annotate `report` in one step
pub fn enrich_report_with_filenames(report: &mut Report, root: impl AsRef<Path>) -> usize {
    FilenameIndex::scan(root).enrich(report)
}

fn test_ident_regex() -> Regex {
    Regex::new(TEST_IDENT_PATTERN).expect("test identifier pattern is valid")
}

fn find_test_idents(pattern: &Regex, source: &str) -> Vec<String> {
    pattern
        .find_iter(source)
        .map(|m| m.as_str().to_string())
        .collect()
}
