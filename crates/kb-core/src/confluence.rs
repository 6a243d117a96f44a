// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Confluence checking.
//!
//! The verdict is cached as a tri-state and reset to `Unknown` by every
//! change to the active set. A scan cut short by a stop request while a run
//! is in progress leaves the cache `Unknown`.
use crate::knuth_bendix::KnuthBendix;
use crate::word::{common_prefix_len, Word};

/// Cached confluence verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Confluence {
    Unknown,
    Confluent,
    NotConfluent,
}

impl KnuthBendix {
    /// Whether the active rules are confluent and nothing is pending.
    ///
    /// Uses the cached verdict when one is known; otherwise scans every
    /// ordered pair of active rules (self-pairs included), checking both
    /// proper overlaps and inclusions of one reducible side in the other.
    /// The scan stops at the first pair whose two derivations reduce to
    /// different words.
    pub fn is_confluent(&self) -> bool {
        if !self.stack.is_empty() {
            return false;
        }
        match self.confluence.get() {
            Confluence::Confluent => return true,
            Confluence::NotConfluent => return false,
            Confluence::Unknown => {}
        }
        match self.scan_critical_pairs() {
            Some(verdict) => {
                self.control.record_work();
                self.confluence.set(if verdict {
                    Confluence::Confluent
                } else {
                    Confluence::NotConfluent
                });
                verdict
            }
            None => false,
        }
    }

    /// Whether a confluence verdict is cached.
    pub fn confluence_known(&self) -> bool {
        self.confluence.get() != Confluence::Unknown
    }

    fn scan_interrupted(&self) -> bool {
        self.control.running() && self.control.should_stop()
    }

    /// `None` when interrupted before the scan finished.
    fn scan_critical_pairs(&self) -> Option<bool> {
        let mut word1 = Word::new();
        let mut word2 = Word::new();
        for rule1 in self.active.iter() {
            let lhs1 = self.rules.lhs(rule1);
            let rhs1 = self.rules.rhs(rule1);
            for rule2 in self.active.iter().rev() {
                if self.scan_interrupted() {
                    return None;
                }
                let lhs2 = self.rules.lhs(rule2);
                let rhs2 = self.rules.rhs(rule2);
                for it in (0..lhs1.len()).rev() {
                    // lhs1 = A·B with B = lhs1[it..]; k letters of B open lhs2.
                    let k = common_prefix_len(&lhs1[it..], lhs2);
                    if k != lhs1.len() - it && k != lhs2.len() {
                        continue;
                    }
                    word1.clear();
                    word1.extend_from_slice(&lhs1[..it]);
                    word1.extend_from_slice(rhs2);
                    word1.extend_from_slice(&lhs1[it + k..]);
                    word2.clear();
                    word2.extend_from_slice(rhs1);
                    word2.extend_from_slice(&lhs2[k..]);
                    if word1 != word2 {
                        self.rewrite(&mut word1);
                        self.rewrite(&mut word2);
                        if word1 != word2 {
                            return Some(false);
                        }
                    }
                }
            }
        }
        Some(true)
    }
}
