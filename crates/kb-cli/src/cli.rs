// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface.
use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Knuth-Bendix completion for finitely presented monoids")]
pub struct Args {
    /// Log filter (e.g. `debug`, `kb_core=trace`); overrides RUST_LOG
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run completion on a presentation and print the resulting rules
    Complete(CompleteArgs),
    /// Reduce words with a completed presentation or a saved rule set
    Reduce(ReduceArgs),
}

#[derive(clap::Args, Debug)]
pub struct CompleteArgs {
    /// Presentation JSON: {"alphabet": "ab", "rules": [["aa", ""], ...]}
    #[arg(long)]
    pub presentation: PathBuf,
    /// Settings JSON; flags below override its fields
    #[arg(long)]
    pub settings: Option<PathBuf>,
    /// Stop once this many rules are active
    #[arg(long)]
    pub max_rules: Option<usize>,
    /// Skip overlaps whose measure exceeds this bound
    #[arg(long)]
    pub max_overlap: Option<usize>,
    /// Suspend the run after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    /// Raise the overlap bound from 1 until the system is confluent
    #[arg(long)]
    pub by_overlap_length: bool,
    /// Write the active rules to this file as a rule-set snapshot
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["presentation", "snapshot"])))]
pub struct ReduceArgs {
    /// Presentation JSON; completion runs before reducing
    #[arg(long)]
    pub presentation: Option<PathBuf>,
    /// Rule-set snapshot written by `kb complete --output`
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
    /// Words to reduce
    #[arg(required = true)]
    pub words: Vec<String>,
}
