// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `kb`: Knuth–Bendix completion from the command line.
//!
//! # Usage
//! ```text
//! kb complete --presentation p.json [--settings s.json] [--max-rules N]
//!             [--max-overlap N] [--timeout-ms N] [--by-overlap-length]
//!             [--output rules.json]
//! kb reduce (--presentation p.json | --snapshot rules.json) WORD...
//! ```
//!
//! Results go to stdout; logs go to stderr. The exit code is non-zero only
//! on errors; bounded or interrupted runs still succeed.

mod cli;
mod commands;

use std::io::{self, Write};

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command};

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!("install log subscriber: {e}"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &args.cmd {
        Command::Complete(a) => commands::complete(a, &mut out)?,
        Command::Reduce(a) => commands::reduce(a, &mut out)?,
    }
    out.flush()?;
    Ok(())
}
