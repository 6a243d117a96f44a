// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The completion driver.
//!
//! A pass
//! 1. drains the pending stack,
//! 2. re-stages a copy of every active rule so that rules made reducible by
//!    later ones are normalised,
//! 3. walks the active list with an outer cursor and, for each outer rule,
//!    walks back towards the head with an inner cursor, generating overlaps
//!    in both orientations; every candidate drains the stack immediately,
//! 4. checks confluence every `check_confluence_interval` overlaps.
//!
//! Rules removed from the active list move the cursors sitting on them to
//! their successors, and rules appended while a cursor is at the end become
//! that cursor's next rule. A run that stops part-way through a pass (rule
//! bound, stop request, deadline) keeps the pass: the phase, both cursors and
//! the outer rule in progress survive, and the next run continues from them.
//! Overlap scans run to completion unless a stop is requested, in which case
//! the pair is repeated on resume.
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::confluence::Confluence;
use crate::knuth_bendix::KnuthBendix;
use crate::rewrite::rewrite_from_left;
use crate::rule::RuleId;
use crate::runner::RunOutcome;
use crate::word::{is_subword, shortlex_cmp};

/// Stage of the current completion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Phase {
    /// No pass under way; the next run starts one.
    #[default]
    Idle,
    /// Copying active rules onto the stack; `next_outer` is the next to copy.
    Restage,
    /// Pairing rules through `next_outer` and `next_inner`.
    Overlaps,
}

/// Where an unfinished pass resumes.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Pass {
    pub(crate) phase: Phase,
    /// Outer rule whose inner scan is under way, with its generation.
    outer: Option<(RuleId, u64)>,
    /// Overlap calls since the last periodic confluence check.
    processed: usize,
    /// No overlap bound applied and no run stopped during this pass.
    exhaustive: bool,
}

impl KnuthBendix {
    /// Runs completion until confluence, a configured bound, or a stop
    /// request.
    pub fn run(&mut self) -> RunOutcome {
        self.run_with_budget(None)
    }

    /// Like [`run`](Self::run) but suspends once `budget` has elapsed.
    ///
    /// Every run does at least one unit of work before the budget is
    /// checked, so repeated short runs always reach a terminal state.
    pub fn run_for(&mut self, budget: Duration) -> RunOutcome {
        self.run_with_budget(Some(budget))
    }

    /// Stores `max_rules` and `max_overlap` in the settings, then runs.
    ///
    /// The bound stops growth: the run suspends once `max_rules` rules are
    /// active, so a run that starts at or below the bound never ends above
    /// it. Rules are never dropped to meet the bound; an engine that already
    /// holds more than `max_rules` active rules returns
    /// [`RunOutcome::Bounded`] without doing any work.
    pub fn run_bounded(&mut self, max_rules: usize, max_overlap: Option<usize>) -> RunOutcome {
        self.settings.max_rules = Some(max_rules);
        self.settings.max_overlap = max_overlap;
        self.run()
    }

    /// Completion by increasing overlap length.
    ///
    /// Runs with `max_overlap` set to 1, 2, 3, ... until a run is not merely
    /// bounded by the overlap measure. Periodic confluence checks are off for
    /// the inner runs. Both settings are restored afterwards.
    pub fn run_by_overlap_length(&mut self) -> RunOutcome {
        let saved = self.settings;
        self.settings.max_overlap = Some(1);
        self.settings.check_confluence_interval = usize::MAX;
        self.start_run(None);
        let outcome = loop {
            let outcome = self.complete();
            if outcome != RunOutcome::Bounded || self.at_rule_limit() {
                break outcome;
            }
            self.settings.max_overlap = self.settings.max_overlap.map(|m| m + 1);
            debug!(
                max_overlap = ?self.settings.max_overlap,
                active = self.active.len(),
                "raising overlap bound"
            );
        };
        self.settings.max_overlap = saved.max_overlap;
        self.settings.check_confluence_interval = saved.check_confluence_interval;
        self.finish_run(outcome)
    }

    fn run_with_budget(&mut self, budget: Option<Duration>) -> RunOutcome {
        self.start_run(budget);
        let outcome = self.complete();
        self.finish_run(outcome)
    }

    fn start_run(&mut self, budget: Option<Duration>) {
        self.control.begin(budget);
        info!(
            active = self.active.len(),
            pending = self.stack.len(),
            max_rules = ?self.settings.max_rules,
            max_overlap = ?self.settings.max_overlap,
            "completion started"
        );
    }

    fn finish_run(&mut self, outcome: RunOutcome) -> RunOutcome {
        self.control.end();
        info!(
            %outcome,
            active = self.active.len(),
            inactive = self.rules.inactive_len(),
            defined = self.rules.defined(),
            "completion finished"
        );
        outcome
    }

    pub(crate) fn at_rule_limit(&self) -> bool {
        self.settings
            .max_rules
            .is_some_and(|max| self.active.len() >= max)
    }

    pub(crate) fn stopped(&self) -> bool {
        self.control.should_stop() || self.at_rule_limit()
    }

    fn complete(&mut self) -> RunOutcome {
        self.measure = self.settings.overlap_policy.measure();
        if self.settings.max_rules.is_some_and(|max| self.active.len() > max) {
            return RunOutcome::Bounded;
        }
        loop {
            let outcome = self.complete_pass();
            // A finished pass that was not exhaustive may have missed pairs;
            // without a bound to respect, go round again.
            if outcome != RunOutcome::Bounded || self.settings.is_bounded() || self.stopped() {
                return outcome;
            }
        }
    }

    fn complete_pass(&mut self) -> RunOutcome {
        if self.pass.phase == Phase::Idle {
            if self.stack.is_empty() && self.is_confluent() && !self.stopped() {
                return RunOutcome::Confluent;
            }
            self.pass = Pass {
                phase: Phase::Restage,
                outer: None,
                processed: 0,
                exhaustive: true,
            };
            self.clear_stack();
            self.next_outer = self.active.head();
        } else {
            self.clear_stack();
        }
        if self.settings.max_overlap.is_some() {
            self.pass.exhaustive = false;
        }

        if self.pass.phase == Phase::Restage {
            self.restage();
        }
        if self.pass.phase == Phase::Overlaps {
            self.scan_overlaps();
        }

        if self.stopped() {
            self.pass.exhaustive = false;
        } else {
            if self.pass.exhaustive && self.stack.is_empty() {
                self.confluence.set(Confluence::Confluent);
            }
            self.pass = Pass::default();
            self.next_outer = None;
            self.next_inner = None;
        }

        if self.stack.is_empty() && self.confluence.get() == Confluence::Confluent {
            RunOutcome::Confluent
        } else if self.control.interrupted() {
            RunOutcome::Interrupted
        } else if self.is_confluent() {
            RunOutcome::Confluent
        } else if self.control.interrupted() {
            RunOutcome::Interrupted
        } else {
            RunOutcome::Bounded
        }
    }

    fn restage(&mut self) {
        while let Some(rule) = self.next_outer {
            if self.stopped() {
                return;
            }
            self.next_outer = self.active.next(rule);
            let copy = self.rules.copy_rule(rule);
            self.push_stack(copy);
        }
        if !self.stopped() {
            self.pass.phase = Phase::Overlaps;
            self.next_outer = self.active.head();
        }
    }

    fn scan_overlaps(&mut self) {
        loop {
            let (outer, generation) = match self.pass.outer {
                Some(current) => current,
                None => {
                    let Some(outer) = self.next_outer else {
                        break;
                    };
                    if self.stopped() {
                        break;
                    }
                    let generation = self.rules.generation(outer);
                    self.next_inner = Some(outer);
                    self.next_outer = self.active.next(outer);
                    if !self.overlap(outer, outer) {
                        if self.rules.generation(outer) == generation {
                            self.next_outer = Some(outer);
                        }
                        break;
                    }
                    self.pass.outer = Some((outer, generation));
                    (outer, generation)
                }
            };
            while self.next_inner != self.active.head()
                && self.rules.generation(outer) == generation
                && !self.stopped()
            {
                let Some(inner) = self.active.prev_of(self.next_inner) else {
                    break;
                };
                self.next_inner = Some(inner);
                self.pass.processed += 1;
                let mut finished = self.overlap(outer, inner);
                if finished && self.rules.is_active(outer) && self.rules.is_active(inner) {
                    self.pass.processed += 1;
                    finished = self.overlap(inner, outer);
                }
                if !finished && self.rules.is_active(inner) {
                    // Step back so the next run repeats this pair.
                    self.next_inner = self.active.next(inner);
                }
            }
            if self.stopped() {
                break;
            }
            self.pass.outer = None;
            if self.pass.processed > self.settings.check_confluence_interval {
                self.stats.confluence_checks += 1;
                if self.is_confluent() {
                    break;
                }
                self.pass.processed = 0;
            }
            if self.next_outer.is_none() {
                self.clear_stack();
            }
            self.report_progress();
        }
    }

    fn report_progress(&mut self) {
        if self.control.report_due() {
            debug!(
                active = self.active.len(),
                inactive = self.rules.inactive_len(),
                defined = self.rules.defined(),
                pending = self.stack.len(),
                overlaps = self.stats.overlaps_examined,
                "completion progress"
            );
        }
    }

    /// Pushes a candidate and drains the stack, or retires the candidate at
    /// once when its sides already agree.
    pub(crate) fn push_stack(&mut self, id: RuleId) {
        if self.rules.get(id).is_trivial() {
            self.rules.retire(id);
            return;
        }
        self.stack.push(id);
        self.stats.max_stack_depth = self.stats.max_stack_depth.max(self.stack.len());
        self.clear_stack();
    }

    /// Pops candidates until the stack is empty or the run stops.
    ///
    /// Each candidate is reduced on both sides and oriented. A trivial one is
    /// retired. Otherwise every active rule whose reducible side contains the
    /// candidate's is moved back onto the stack, the candidate is activated,
    /// and active replacement sides containing its reducible side are
    /// re-reduced.
    fn clear_stack(&mut self) {
        while !self.stopped() {
            let Some(id) = self.stack.pop() else {
                break;
            };
            self.control.record_work();
            let (index, min_lhs_len) = (&self.index, self.min_lhs_len);
            self.rules.fill(id, |rules, lhs, rhs| {
                rewrite_from_left(lhs, rules, index, min_lhs_len);
                rewrite_from_left(rhs, rules, index, min_lhs_len);
            });
            let rule = self.rules.get_mut(id);
            rule.orient();
            if rule.is_trivial() {
                self.rules.retire(id);
                continue;
            }

            let mut cursor = self.active.head();
            while let Some(other) = cursor {
                cursor = self.active.next(other);
                if is_subword(self.rules.lhs(id), self.rules.lhs(other)) {
                    self.remove_rule(other);
                    self.stack.push(other);
                }
            }
            self.activate(id);

            let mut cursor = self.active.head();
            while let Some(other) = cursor {
                cursor = self.active.next(other);
                if other != id && is_subword(self.rules.lhs(id), self.rules.rhs(other)) {
                    let mut rhs = self.rules.rhs(other).to_vec();
                    self.rewrite(&mut rhs);
                    self.rules.get_mut(other).rhs = rhs;
                }
            }
            self.stats.max_stack_depth = self.stats.max_stack_depth.max(self.stack.len());
        }
    }

    /// Appends an oriented, irreducible rule to the active list and index.
    pub(crate) fn activate(&mut self, id: RuleId) {
        let lhs_len = self.rules.lhs(id).len();
        assert!(
            shortlex_cmp(self.rules.lhs(id), self.rules.rhs(id)).is_gt(),
            "activating a rule whose reducible side is not the larger"
        );
        self.index.insert(id, &self.rules);
        self.rules.set_active(id);
        self.active.push_back(id);
        debug_assert_eq!(self.active.tail(), Some(id));
        if self.next_outer.is_none() {
            self.next_outer = Some(id);
        }
        if self.next_inner.is_none() {
            self.next_inner = Some(id);
        }
        self.min_lhs_len = self.min_lhs_len.min(lhs_len);
        self.confluence.set(Confluence::Unknown);
        debug_assert_eq!(self.index.len(), self.active.len());
        trace!(
            serial = self.rules.get(id).serial,
            lhs = %self.alphabet.decode(self.rules.lhs(id)),
            rhs = %self.alphabet.decode(self.rules.rhs(id)),
            active = self.active.len(),
            "rule activated"
        );
    }

    /// Takes an active rule out of the list and index, leaving it pending.
    fn remove_rule(&mut self, id: RuleId) {
        debug_assert!(self.active.contains(id));
        self.index.remove(id, &self.rules);
        let successor = self.active.remove(id);
        if self.next_outer == Some(id) {
            self.next_outer = successor;
        }
        if self.next_inner == Some(id) {
            self.next_inner = successor;
        }
        self.rules.set_pending(id);
        self.confluence.set(Confluence::Unknown);
        debug_assert_eq!(self.index.len(), self.active.len());
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use super::Phase;
    use crate::{KnuthBendix, Presentation, RuleSetSnapshot, RunOutcome};

    fn s3() -> Presentation {
        Presentation::new("ab")
            .with_rule("aa", "")
            .with_rule("bbb", "")
            .with_rule("abab", "")
    }

    /// Runs `budget`-sized slices until a terminal outcome; returns it with
    /// the number of slices used.
    fn sliced(kb: &mut KnuthBendix, budget: Duration, max_slices: usize) -> (RunOutcome, usize) {
        let mut slices = 1;
        let mut outcome = kb.run_for(budget);
        while outcome == RunOutcome::Interrupted && slices < max_slices {
            outcome = kb.run_for(budget);
            slices += 1;
        }
        (outcome, slices)
    }

    #[test]
    fn zero_budget_still_drains_one_candidate() {
        let mut kb = KnuthBendix::new(&s3()).unwrap();
        assert_eq!(kb.run_for(Duration::ZERO), RunOutcome::Interrupted);
        assert_eq!(kb.pending_count(), 2);
        assert_eq!(kb.active_rule_count(), 1);
        assert_ne!(kb.pass.phase, Phase::Idle);
        assert_eq!(kb.run(), RunOutcome::Confluent);
        assert_eq!(kb.pending_count(), 0);
        assert_eq!(kb.pass.phase, Phase::Idle);
    }

    #[test]
    fn tiny_time_slices_reach_the_uninterrupted_result() {
        let p = Presentation::new("abc").with_rule("", "caaca");
        let mut reference = KnuthBendix::new(&p).unwrap();
        assert_eq!(reference.run(), RunOutcome::Confluent);
        let expected = reference.canonical_rules().unwrap();

        for budget in [Duration::from_nanos(1), Duration::from_micros(20)] {
            let mut kb = KnuthBendix::new(&p).unwrap();
            let (outcome, slices) = sliced(&mut kb, budget, 100_000);
            assert_eq!(outcome, RunOutcome::Confluent, "{budget:?} after {slices} slices");
            assert_eq!(kb.canonical_rules().unwrap(), expected, "{budget:?}");
            assert_eq!(kb.reduce("ca").unwrap(), "ac");
        }
    }

    #[test]
    fn resumed_pass_keeps_its_cursors() {
        let p = Presentation::new("ab").with_rule("aba", "bab");
        let mut kb = KnuthBendix::new(&p).unwrap();
        assert_eq!(kb.run_bounded(6, None), RunOutcome::Bounded);
        assert_eq!(kb.pass.phase, Phase::Overlaps);
        let outer = kb.next_outer;
        let examined = kb.stats().overlaps_examined;
        // Nothing can be activated at the bound, so nothing moves.
        assert_eq!(kb.run(), RunOutcome::Bounded);
        assert_eq!(kb.next_outer, outer);
        assert_eq!(kb.stats().overlaps_examined, examined);
    }

    #[test]
    fn run_bounded_below_the_current_size_does_nothing() {
        let snapshot = RuleSetSnapshot {
            alphabet: "ab".to_owned(),
            rules: vec![
                ("aa".to_owned(), String::new()),
                ("bb".to_owned(), String::new()),
                ("ba".to_owned(), "ab".to_owned()),
            ],
        };
        let mut kb = KnuthBendix::from_snapshot(&snapshot).unwrap();
        assert_eq!(kb.run_bounded(1, None), RunOutcome::Bounded);
        assert_eq!(kb.active_rule_count(), 3);
        assert_eq!(kb.stats().overlaps_examined, 0);
        kb.settings_mut().max_rules = None;
        assert_eq!(kb.run(), RunOutcome::Confluent);
    }

    #[test]
    fn stop_requested_before_run_is_cleared() {
        let mut kb = KnuthBendix::new(&s3()).unwrap();
        kb.stop_handle().request_stop();
        assert_eq!(kb.run(), RunOutcome::Confluent);
    }

    #[test]
    fn rule_limit_bounds_the_active_set() {
        let p = Presentation::new("ab").with_rule("aba", "bab");
        let mut kb = KnuthBendix::new(&p).unwrap();
        assert_eq!(kb.run_bounded(5, None), RunOutcome::Bounded);
        assert!(kb.active_rule_count() <= 5);
        assert_eq!(kb.settings().max_rules, Some(5));
    }

    #[test]
    fn overlap_length_run_restores_settings() {
        let mut kb = KnuthBendix::new(&s3()).unwrap();
        let before = *kb.settings();
        assert_eq!(kb.run_by_overlap_length(), RunOutcome::Confluent);
        assert_eq!(*kb.settings(), before);
        assert_eq!(kb.reduce("ababab").unwrap(), "ab");
    }

    #[test]
    fn rules_stay_inter_reduced() {
        let mut kb = KnuthBendix::new(&s3()).unwrap();
        kb.run();
        for (lhs, rhs) in kb.active_rules() {
            assert_eq!(kb.reduce(&rhs).unwrap(), rhs, "{lhs} -> {rhs}");
        }
    }
}
