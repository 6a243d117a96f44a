// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::{presets::ASCII_MARKDOWN, Table};
use kb_core::{KnuthBendix, Presentation, RuleSetSnapshot, RunOutcome, Settings};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::cli::{CompleteArgs, ReduceArgs};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parse {}", path.display()))
}

fn show(word: &str) -> &str {
    if word.is_empty() {
        "ε"
    } else {
        word
    }
}

pub fn complete(args: &CompleteArgs, out: &mut impl Write) -> Result<()> {
    let presentation: Presentation = read_json(&args.presentation)?;
    let mut settings = match &args.settings {
        Some(path) => read_json(path)?,
        None => Settings::default(),
    };
    if args.max_rules.is_some() {
        settings.max_rules = args.max_rules;
    }
    if args.max_overlap.is_some() {
        settings.max_overlap = args.max_overlap;
    }
    let mut kb = KnuthBendix::new(&presentation)
        .context("invalid presentation")?
        .with_settings(settings);

    let budget = args.timeout_ms.map(Duration::from_millis);
    let outcome = if args.by_overlap_length {
        if let Some(budget) = budget {
            let handle = kb.stop_handle();
            thread::spawn(move || {
                thread::sleep(budget);
                handle.request_stop();
            });
        }
        kb.run_by_overlap_length()
    } else {
        match budget {
            Some(budget) => kb.run_for(budget),
            None => kb.run(),
        }
    };
    if outcome != RunOutcome::Confluent {
        warn!(%outcome, "system is not known to be confluent");
    }

    writeln!(out, "outcome: {outcome}")?;
    writeln!(out, "rules: {}", kb.active_rule_count())?;
    let mut table = Table::new();
    table
        .load_preset(ASCII_MARKDOWN)
        .set_header(vec!["#", "reducible", "replacement"]);
    for (n, (lhs, rhs)) in kb.active_rules().iter().enumerate() {
        table.add_row(vec![n.to_string(), show(lhs).to_owned(), show(rhs).to_owned()]);
    }
    writeln!(out, "{table}")?;

    if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &kb.snapshot())?;
        writer.flush()?;
        info!(path = %path.display(), "rule set written");
    }
    Ok(())
}

pub fn reduce(args: &ReduceArgs, out: &mut impl Write) -> Result<()> {
    let kb = match (&args.presentation, &args.snapshot) {
        (Some(path), _) => {
            let presentation: Presentation = read_json(path)?;
            let mut kb = KnuthBendix::new(&presentation).context("invalid presentation")?;
            let outcome = kb.run();
            if outcome != RunOutcome::Confluent {
                warn!(%outcome, "reducing with a system that is not known to be confluent");
            }
            kb
        }
        (None, Some(path)) => {
            let snapshot: RuleSetSnapshot = read_json(path)?;
            KnuthBendix::from_snapshot(&snapshot).context("invalid rule set")?
        }
        (None, None) => anyhow::bail!("either --presentation or --snapshot is required"),
    };
    for word in &args.words {
        let reduced = kb
            .reduce(word)
            .with_context(|| format!("cannot reduce {word:?}"))?;
        writeln!(out, "{}", show(&reduced))?;
    }
    Ok(())
}
