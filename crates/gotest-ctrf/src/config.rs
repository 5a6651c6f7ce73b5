// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the gotest-ctrf command line
//!
//! This module provides the flag set of the binary, the logging level it
//! implies, and the report environment built from the `--app*`, `--os*` and
//! `--build*` flags.

use std::path::PathBuf;

use clap::Parser;
use gotest_ctrf_schema::Environment;

/// Default report destination
pub const DEFAULT_OUTPUT: &str = "ctrf-report.json";

/// Output path that means "write the report to stdout"
pub const STDOUT_OUTPUT: &str = "-";

/// Default root scanned for `*_test.go` files
pub const DEFAULT_SOURCE_ROOT: &str = ".";

/// Convert `go test -json` output into a CTRF test report
///
/// Example:
///   go test -json ./... | gotest-ctrf -o ctrf-report.json
#[derive(Parser, Debug, Clone)]
#[command(name = "gotest-ctrf")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path of the CTRF report to write
    ///
    /// Use `-` to write the report to stdout.
    #[arg(short, long, env = "GOTEST_CTRF_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Read test events from this file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Echo test output as it is read, and log at debug level
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - no console output, warnings and errors only
    ///
    /// Overrides --verbose for echoing test output.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Name of the application under test
    #[arg(long = "appName")]
    pub app_name: Option<String>,

    /// Version of the application under test
    #[arg(long = "appVersion")]
    pub app_version: Option<String>,

    /// Operating system platform
    #[arg(long = "osPlatform")]
    pub os_platform: Option<String>,

    /// Operating system release
    #[arg(long = "osRelease")]
    pub os_release: Option<String>,

    /// Operating system version
    #[arg(long = "osVersion")]
    pub os_version: Option<String>,

    /// Build name
    #[arg(long = "buildName")]
    pub build_name: Option<String>,

    /// Build number
    #[arg(long = "buildNumber")]
    pub build_number: Option<String>,

    /// Directory searched for `*_test.go` files when annotating results
    #[arg(long, default_value = DEFAULT_SOURCE_ROOT)]
    pub source_root: PathBuf,

    /// Do not annotate results with the Go file declaring each test
    #[arg(long, default_value = "false")]
    pub no_enrich: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            input: None,
            verbose: false,
            quiet: false,
            app_name: None,
            app_version: None,
            os_platform: None,
            os_release: None,
            os_version: None,
            build_name: None,
            build_number: None,
            source_root: PathBuf::from(DEFAULT_SOURCE_ROOT),
            no_enrich: false,
        }
    }
}

impl Config {
    /// Get the log level based on verbose/quiet flags
    ///
    /// Quiet wins over verbose, as it does for echoing.
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::WARN
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// True when test output should be echoed while reading
    #[must_use]
    pub fn effective_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// True when the report goes to stdout rather than a file
    #[must_use]
    pub fn writes_to_stdout(&self) -> bool {
        self.output.as_os_str() == STDOUT_OUTPUT
    }

    /// Report environment from the metadata flags
    ///
    /// Returns `None` when no flag carries a non-empty value.
    #[must_use]
    pub fn environment(&self) -> Option<Environment> {
        Environment {
            app_name: self.app_name.clone(),
            app_version: self.app_version.clone(),
            os_platform: self.os_platform.clone(),
            os_release: self.os_release.clone(),
            os_version: self.os_version.clone(),
            build_name: self.build_name.clone(),
            build_number: self.build_number.clone(),
        }
        .non_empty()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file is specified but doesn't exist or isn't a file
    /// - The source root doesn't exist or isn't a directory (unless
    ///   enrichment is disabled)
    /// - The output file's parent directory doesn't exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(ConfigError::InputNotFound(input.clone()));
            }
            if !input.is_file() {
                return Err(ConfigError::InputNotFile(input.clone()));
            }
        }

        if !self.no_enrich {
            if !self.source_root.exists() {
                return Err(ConfigError::SourceRootNotFound(self.source_root.clone()));
            }
            if !self.source_root.is_dir() {
                return Err(ConfigError::SourceRootNotDirectory(self.source_root.clone()));
            }
        }

        if !self.writes_to_stdout()
            && let Some(parent) = self.output.parent()
            && !parent.as_os_str().is_empty()
            && !parent.is_dir()
        {
            return Err(ConfigError::OutputDirectoryNotFound(parent.to_path_buf()));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input file not found
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Input path is not a regular file
    #[error("Input path is not a file: {0}")]
    InputNotFile(PathBuf),

    /// Source root not found
    #[error("Source root not found: {0}")]
    SourceRootNotFound(PathBuf),

    /// Source root is not a directory
    #[error("Source root is not a directory: {0}")]
    SourceRootNotDirectory(PathBuf),

    /// Directory for the report file does not exist
    #[error("Output directory not found: {0}")]
    OutputDirectoryNotFound(PathBuf),
}
