// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gotest-ctrf-schema

use std::fmt;

use thiserror::Error;

/// Errors that can occur while serializing, writing or loading a report
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The report failed validation; carries every violation found
    #[error("report is invalid: {0}")]
    InvalidReport(ValidationErrors),

    /// Error encoding or decoding JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error writing the report file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single structural violation of the report schema
///
/// The `Display` output of each variant is stable and may be matched on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required property is absent (or empty, for required strings)
    #[error("missing property '{path}'")]
    MissingProperty {
        /// Dotted path of the property, e.g. `results.tool.name`
        path: String,
    },

    /// A property is present but holds an unacceptable value
    #[error("invalid property '{path}': {reason}")]
    InvalidProperty {
        /// Dotted path of the property
        path: String,
        /// What is wrong with the value
        reason: String,
    },

    /// `summary.tests` disagrees with the per-status counters
    #[error("inconsistent summary: tests is {tests} but status counters sum to {sum}")]
    InconsistentSummary {
        /// Value of `summary.tests`
        tests: u64,
        /// Sum of passed, failed, pending, skipped and other
        sum: u128,
    },
}

impl ValidationError {
    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::MissingProperty { path: path.into() }
    }

    pub(crate) fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProperty {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Every violation collected by one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Number of violations
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the report passed validation
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the violations in the order they were found
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// True when a violation with exactly this message was collected
    #[must_use]
    pub fn contains_message(&self, message: &str) -> bool {
        self.0.iter().any(|e| e.to_string() == message)
    }

    /// Consume into the underlying list
    #[must_use]
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }

    /// `Ok(())` when empty, otherwise `Err(self)`
    ///
    /// # Errors
    ///
    /// Returns `self` if at least one violation was collected.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub(crate) fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_stable() {
        assert_eq!(
            ValidationError::missing("results.tool.name").to_string(),
            "missing property 'results.tool.name'"
        );
        assert_eq!(
            ValidationError::invalid("results.tests[0].duration", "must not be negative")
                .to_string(),
            "invalid property 'results.tests[0].duration': must not be negative"
        );
        assert_eq!(
            ValidationError::InconsistentSummary { tests: 3, sum: 2 }.to_string(),
            "inconsistent summary: tests is 3 but status counters sum to 2"
        );
    }

    #[test]
    fn test_errors_display_joins_all() {
        let errors = ValidationErrors::from(vec![
            ValidationError::missing("results.tool.name"),
            ValidationError::missing("results.summary"),
        ]);
        assert_eq!(
            errors.to_string(),
            "missing property 'results.tool.name'; missing property 'results.summary'"
        );

        let err = SchemaError::InvalidReport(errors);
        assert!(err.to_string().starts_with("report is invalid"));
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::default().into_result().is_ok());
        let errors = ValidationErrors::from(vec![ValidationError::missing("results")]);
        assert_eq!(errors.clone().into_result(), Err(errors));
    }
}
