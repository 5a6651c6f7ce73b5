// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotest-ctrf library
//!
//! This module exports the command line configuration and the conversion
//! pipeline of the `gotest-ctrf` binary for use in integration tests and as
//! a library.

pub mod config;
pub mod run;

pub use config::{Config, ConfigError};
pub use run::{Outcome, RunError, execute};
