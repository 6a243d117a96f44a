// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Critical-pair generation.
//!
//! For rules `u` and `v` whose reducible sides overlap as `u.lhs = A·B` and
//! `v.lhs = B·C` with `B` non-empty, the word `A·B·C` rewrites both to
//! `A·v.rhs` and to `u.rhs·C`. That pair is pushed as a new candidate.
use serde::{Deserialize, Serialize};

use crate::knuth_bendix::KnuthBendix;
use crate::rule::RuleId;

/// Score of an overlap from `(|AB|, |A|, |BC|)`.
pub(crate) type Measure = fn(usize, usize, usize) -> usize;

/// How an overlap `A·B·C` is scored against [`crate::Settings::max_overlap`].
///
/// The policy only changes which overlaps a bounded run explores; it never
/// affects the result of an unbounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// `|A| + |BC|`, the length of the overlapped word.
    #[default]
    Abc,
    /// `|AB| + |BC|`.
    AbBc,
    /// `max(|AB|, |BC|)`.
    MaxAbBc,
}

fn abc(_ab: usize, a: usize, bc: usize) -> usize {
    a + bc
}

fn ab_bc(ab: usize, _a: usize, bc: usize) -> usize {
    ab + bc
}

fn max_ab_bc(ab: usize, _a: usize, bc: usize) -> usize {
    ab.max(bc)
}

impl OverlapPolicy {
    pub(crate) fn measure(self) -> Measure {
        match self {
            Self::Abc => abc,
            Self::AbBc => ab_bc,
            Self::MaxAbBc => max_ab_bc,
        }
    }
}

impl KnuthBendix {
    /// Pushes every critical pair of `u` over `v`, shortest `B` first.
    ///
    /// `B` is kept shorter than both reducible sides; active reducible sides
    /// never contain one another, so equal-length positions would be
    /// inclusions. The scan ends at the first position scoring above
    /// `max_overlap`, or as soon as either rule leaves the active set (a
    /// pushed candidate drains the stack, which may remove it).
    ///
    /// Deadlines and rule bounds do not cut the scan short: once they fire,
    /// candidates stay on the pending stack for the next run. Only a stop
    /// request does, and then `false` is returned so the caller can repeat
    /// the pair.
    pub(crate) fn overlap(&mut self, u: RuleId, v: RuleId) -> bool {
        let gen_u = self.rules.generation(u);
        let gen_v = self.rules.generation(v);
        let u_len = self.rules.lhs(u).len();
        let v_len = self.rules.lhs(v).len();
        let lower = u_len - u_len.min(v_len);
        let max_overlap = self.settings.max_overlap;
        let measure = self.measure;

        let Some(mut split) = u_len.checked_sub(1) else {
            return true;
        };
        while split > lower {
            if self.rules.generation(u) != gen_u || self.rules.generation(v) != gen_v {
                return true;
            }
            if self.control.stop_requested() {
                return false;
            }
            if max_overlap.is_some_and(|max| measure(u_len, split, v_len) > max) {
                return true;
            }
            self.stats.overlaps_examined += 1;
            self.control.record_work();
            if self.rules.lhs(v).starts_with(&self.rules.lhs(u)[split..]) {
                let id = self.rules.acquire();
                self.rules.fill(id, |rules, lhs, rhs| {
                    lhs.extend_from_slice(&rules.lhs(u)[..split]);
                    lhs.extend_from_slice(rules.rhs(v));
                    rhs.extend_from_slice(rules.rhs(u));
                    rhs.extend_from_slice(&rules.lhs(v)[u_len - split..]);
                });
                self.push_stack(id);
            }
            split -= 1;
        }
        true
    }
}
