// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Completion engine state and its public surface.
//!
//! The driver loop lives in `completion`, overlap generation in `overlap`,
//! and the confluence checker in `confluence`; all of them extend
//! [`KnuthBendix`] with further `impl` blocks.
use std::cell::Cell;
use std::fmt;

use serde::Serialize;

use crate::active::ActiveRules;
use crate::alphabet::Alphabet;
use crate::completion::Pass;
use crate::confluence::Confluence;
use crate::error::KnuthBendixError;
use crate::index::RuleIndex;
use crate::overlap::Measure;
use crate::presentation::Presentation;
use crate::rewrite::rewrite_from_left;
use crate::rule::{RuleArena, RuleId};
use crate::runner::{RunControl, StopHandle};
use crate::settings::Settings;
use crate::word::{shortlex_cmp, Letter, Word};

/// Counters describing the work done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionStats {
    /// Rules ever created, including candidates that turned out trivial.
    pub rules_defined: u64,
    /// Deepest the pending stack has been.
    pub max_stack_depth: usize,
    /// Overlap positions examined by the critical-pair generator.
    pub overlaps_examined: u64,
    /// Periodic confluence checks run by the driver.
    pub confluence_checks: u64,
    /// Rules currently parked in the inactive pool.
    pub inactive_rules: usize,
}

/// Knuth–Bendix completion over a fixed alphabet.
///
/// Construct from a [`Presentation`] (its relations become pending
/// candidates), drive with [`run`](Self::run) or one of its bounded variants,
/// and query with [`reduce`](Self::reduce). Every query is valid at any time;
/// normal forms are canonical only once [`is_confluent`](Self::is_confluent)
/// holds.
///
/// ```
/// use kb_core::{KnuthBendix, Presentation, RunOutcome};
///
/// let p = Presentation::new("ab")
///     .with_rule("aa", "")
///     .with_rule("bb", "")
///     .with_rule("abab", "");
/// let mut kb = KnuthBendix::new(&p)?;
/// assert_eq!(kb.run(), RunOutcome::Confluent);
/// assert_eq!(kb.reduce("ba")?, "ab");
/// assert_eq!(kb.active_rule_count(), 3);
/// # Ok::<(), kb_core::KnuthBendixError>(())
/// ```
pub struct KnuthBendix {
    pub(crate) alphabet: Alphabet,
    pub(crate) settings: Settings,
    pub(crate) rules: RuleArena,
    pub(crate) active: ActiveRules,
    pub(crate) index: RuleIndex,
    pub(crate) stack: Vec<RuleId>,
    pub(crate) confluence: Cell<Confluence>,
    /// Lower bound on active reducible-side lengths; only reset by `reset`.
    pub(crate) min_lhs_len: usize,
    pub(crate) next_outer: Option<RuleId>,
    pub(crate) next_inner: Option<RuleId>,
    pub(crate) pass: Pass,
    pub(crate) measure: Measure,
    pub(crate) control: RunControl,
    pub(crate) stats: CompletionStats,
    /// Arena definition count at the last `reset`.
    defined_before_reset: u64,
}

impl KnuthBendix {
    /// Creates an engine with every relation of `presentation` pending.
    ///
    /// # Errors
    /// Fails when the presentation's alphabet or relations do not validate.
    pub fn new(presentation: &Presentation) -> Result<Self, KnuthBendixError> {
        let (alphabet, relations) = presentation.validate()?;
        let mut kb = Self::with_alphabet(alphabet);
        for (u, v) in &relations {
            kb.stage(u, v);
        }
        Ok(kb)
    }

    /// Creates an engine with no relations.
    pub fn with_alphabet(alphabet: Alphabet) -> Self {
        let settings = Settings::default();
        Self {
            alphabet,
            measure: settings.overlap_policy.measure(),
            settings,
            rules: RuleArena::default(),
            active: ActiveRules::default(),
            index: RuleIndex::default(),
            stack: Vec::new(),
            confluence: Cell::new(Confluence::Unknown),
            min_lhs_len: usize::MAX,
            next_outer: None,
            next_inner: None,
            pass: Pass::default(),
            control: RunControl::default(),
            stats: CompletionStats::default(),
            defined_before_reset: 0,
        }
    }

    /// Replaces the settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings; changes apply from the next run.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// The alphabet words are encoded against.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Stages the relation `lhs = rhs` as a pending candidate.
    ///
    /// Nothing is reduced or activated until the next run. Equal words are a
    /// no-op.
    ///
    /// # Errors
    /// Returns [`KnuthBendixError::InvalidSymbol`] for letters outside the
    /// alphabet.
    pub fn add_rule(&mut self, lhs: &str, rhs: &str) -> Result<(), KnuthBendixError> {
        let lhs = self.alphabet.encode(lhs)?;
        let rhs = self.alphabet.encode(rhs)?;
        self.stage(&lhs, &rhs);
        Ok(())
    }

    fn stage(&mut self, lhs: &[Letter], rhs: &[Letter]) {
        if lhs == rhs {
            return;
        }
        let id = self.rules.new_rule(lhs, rhs);
        self.stack.push(id);
        self.stats.max_stack_depth = self.stats.max_stack_depth.max(self.stack.len());
    }

    pub(crate) fn rewrite(&self, word: &mut Word) {
        rewrite_from_left(word, &self.rules, &self.index, self.min_lhs_len);
    }

    /// Reduces `word` with the rules active right now.
    ///
    /// # Errors
    /// Returns [`KnuthBendixError::InvalidSymbol`] for letters outside the
    /// alphabet.
    pub fn reduce(&self, word: &str) -> Result<String, KnuthBendixError> {
        let mut w = self.alphabet.encode(word)?;
        self.rewrite(&mut w);
        Ok(self.alphabet.decode(&w))
    }

    /// Reduces an internal word. Letters must come from this engine's
    /// alphabet.
    pub fn reduce_word(&self, word: &[Letter]) -> Word {
        let mut w = word.to_vec();
        self.rewrite(&mut w);
        w
    }

    /// Runs completion, then reduces `word`.
    ///
    /// # Errors
    /// Returns [`KnuthBendixError::InvalidSymbol`] for letters outside the
    /// alphabet; the word is checked before completion starts.
    pub fn normal_form(&mut self, word: &str) -> Result<String, KnuthBendixError> {
        let mut w = self.alphabet.encode(word)?;
        self.run();
        self.rewrite(&mut w);
        Ok(self.alphabet.decode(&w))
    }

    /// Whether `u` and `v` represent the same element.
    ///
    /// Tries the current rules first and only runs completion when they do
    /// not already identify the words. A `false` answer is definitive only
    /// when the run reached confluence.
    ///
    /// # Errors
    /// Returns [`KnuthBendixError::InvalidSymbol`] for letters outside the
    /// alphabet.
    pub fn equal_to(&mut self, u: &str, v: &str) -> Result<bool, KnuthBendixError> {
        let mut u = self.alphabet.encode(u)?;
        let mut v = self.alphabet.encode(v)?;
        if u == v {
            return Ok(true);
        }
        self.rewrite(&mut u);
        self.rewrite(&mut v);
        if u == v {
            return Ok(true);
        }
        self.run();
        self.rewrite(&mut u);
        self.rewrite(&mut v);
        Ok(u == v)
    }

    /// Number of active rules.
    pub fn active_rule_count(&self) -> usize {
        self.active.len()
    }

    /// Number of rules parked in the inactive pool.
    pub fn inactive_rule_count(&self) -> usize {
        self.rules.inactive_len()
    }

    /// Number of candidates waiting on the pending stack.
    pub fn pending_count(&self) -> usize {
        self.stack.len()
    }

    /// Active rules as `(reducible, replacement)` in insertion order.
    pub fn active_rules(&self) -> Vec<(String, String)> {
        self.active
            .iter()
            .map(|id| {
                (
                    self.alphabet.decode(self.rules.lhs(id)),
                    self.alphabet.decode(self.rules.rhs(id)),
                )
            })
            .collect()
    }

    /// Active rules sorted by reducible side in shortlex order.
    ///
    /// # Errors
    /// Returns [`KnuthBendixError::NotReady`] unless the system is confluent.
    pub fn canonical_rules(&self) -> Result<Vec<(String, String)>, KnuthBendixError> {
        if !self.is_confluent() {
            return Err(KnuthBendixError::NotReady(
                "canonical rules require a confluent system",
            ));
        }
        let mut ids: Vec<RuleId> = self.active.iter().collect();
        ids.sort_by(|&a, &b| shortlex_cmp(self.rules.lhs(a), self.rules.lhs(b)));
        Ok(ids
            .into_iter()
            .map(|id| {
                (
                    self.alphabet.decode(self.rules.lhs(id)),
                    self.alphabet.decode(self.rules.rhs(id)),
                )
            })
            .collect())
    }

    /// Work counters.
    pub fn stats(&self) -> CompletionStats {
        CompletionStats {
            rules_defined: self.rules.defined() - self.defined_before_reset,
            inactive_rules: self.rules.inactive_len(),
            ..self.stats
        }
    }

    /// Handle for requesting a cooperative stop from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.control.handle()
    }

    /// Drops every active and pending rule into the inactive pool and clears
    /// the index, the cached confluence state, any unfinished pass, and the
    /// counters. The alphabet and settings are kept.
    pub fn reset(&mut self) {
        let active: Vec<RuleId> = self.active.iter().collect();
        self.active.clear();
        self.index.clear();
        for id in active {
            self.rules.retire(id);
        }
        for id in std::mem::take(&mut self.stack) {
            self.rules.retire(id);
        }
        self.confluence.set(Confluence::Unknown);
        self.min_lhs_len = usize::MAX;
        self.next_outer = None;
        self.next_inner = None;
        self.pass = Pass::default();
        self.stats = CompletionStats::default();
        self.defined_before_reset = self.rules.defined();
    }
}

impl Clone for KnuthBendix {
    /// Copies the active rules in order, the pending stack and the settings.
    /// The inactive pool is not copied, an unfinished pass starts over in the
    /// clone, and the clone gets its own stop handle.
    fn clone(&self) -> Self {
        let mut copy = Self::with_alphabet(self.alphabet.clone()).with_settings(self.settings);
        for id in self.active.iter() {
            let new = copy.rules.new_rule(self.rules.lhs(id), self.rules.rhs(id));
            copy.activate(new);
        }
        for &id in &self.stack {
            let new = copy.rules.new_rule(self.rules.lhs(id), self.rules.rhs(id));
            copy.stack.push(new);
        }
        copy.next_outer = None;
        copy.next_inner = None;
        copy.confluence.set(self.confluence.get());
        copy.stats = self.stats;
        copy
    }
}

impl fmt::Debug for KnuthBendix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnuthBendix")
            .field("alphabet", &self.alphabet.to_string())
            .field("active", &self.active.len())
            .field("pending", &self.stack.len())
            .field("confluence", &self.confluence.get())
            .field("phase", &self.pass.phase)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for KnuthBendix {
    /// `{lhs -> rhs, ...}` in insertion order; the empty word prints as `ε`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |w: &[Letter]| {
            if w.is_empty() {
                "ε".to_owned()
            } else {
                self.alphabet.decode(w)
            }
        };
        f.write_str("{")?;
        for (n, id) in self.active.iter().enumerate() {
            if n > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} -> {}", show(self.rules.lhs(id)), show(self.rules.rhs(id)))?;
        }
        f.write_str("}")
    }
}
