// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotest-ctrf: convert `go test -json` output into a CTRF report
//!
//! Reads the event stream from stdin (or `--input`), writes the report to
//! `--output` and exits non-zero when the build or any test failed.

use std::fs::File;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error};

use gotest_ctrf::config::Config;
use gotest_ctrf::run::{Outcome, execute};

fn main() -> ExitCode {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    match run(&config) {
        Ok(Outcome::Passed) => ExitCode::SUCCESS,
        Ok(outcome @ Outcome::BuildFailed) => {
            if !config.quiet {
                error!("build failed");
            }
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            if !config.quiet {
                error!("{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<Outcome> {
    config.validate().context("invalid configuration")?;
    debug!(?config, "starting conversion");

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();

    let outcome = match &config.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            execute(config, file, &mut stdout, &mut stderr)
        }
        None => execute(config, io::stdin().lock(), &mut stdout, &mut stderr),
    }
    .context("failed to convert test events")?;

    stdout.flush().context("failed to flush stdout")?;
    Ok(outcome)
}
