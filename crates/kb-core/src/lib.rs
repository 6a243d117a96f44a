// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! kb-core: Knuth–Bendix completion for finitely presented monoids.
//!
//! Given an alphabet and defining relations, the engine searches for a
//! finite, confluent, length-reducing string rewriting system for the same
//! congruence. Once one is found, greedy left-to-right rewriting maps every
//! word to a canonical normal form, which solves the word problem.
//!
//! Completion need not terminate. Runs can be bounded by active rule count,
//! by an overlap measure, or by wall-clock time, and can be stopped from
//! another thread; a stopped run resumes where it left off.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod active;
mod alphabet;
mod completion;
mod confluence;
mod error;
mod index;
mod knuth_bendix;
mod overlap;
mod presentation;
mod rewrite;
mod rule;
mod runner;
mod settings;
mod snapshot;
mod word;

/// Alphabet codec between external characters and internal letters.
pub use alphabet::Alphabet;
/// Boundary error type.
pub use error::KnuthBendixError;
/// The completion engine and its counters.
pub use knuth_bendix::{CompletionStats, KnuthBendix};
/// Overlap scoring used under `max_overlap`.
pub use overlap::OverlapPolicy;
/// Alphabet plus defining relations.
pub use presentation::Presentation;
/// Run outcomes and cooperative stopping.
pub use runner::{RunOutcome, StopHandle};
/// Completion tunables.
pub use settings::{Settings, DEFAULT_CHECK_CONFLUENCE_INTERVAL};
/// Persisted active rule sets.
pub use snapshot::RuleSetSnapshot;
/// Internal word representation and shortlex order.
pub use word::{shortlex_cmp, Letter, Word};
