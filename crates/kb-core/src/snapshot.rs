// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted rule sets.
//!
//! A snapshot is the alphabet plus the active rules in insertion order, as
//! external strings. Reloading re-activates the rules directly, without
//! completion, so the restored engine reduces exactly as the captured one did.
//! Pending candidates and counters are not persisted.
use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::error::KnuthBendixError;
use crate::knuth_bendix::KnuthBendix;
use crate::word::{is_subword, shortlex_cmp, Word};

/// Serializable active rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetSnapshot {
    /// Alphabet the rules are written in.
    pub alphabet: String,
    /// `(reducible, replacement)` pairs in activation order.
    pub rules: Vec<(String, String)>,
}

impl KnuthBendix {
    /// Captures the active rules.
    pub fn snapshot(&self) -> RuleSetSnapshot {
        RuleSetSnapshot {
            alphabet: self.alphabet().to_string(),
            rules: self.active_rules(),
        }
    }

    /// Rebuilds an engine whose active rules are exactly those of `snapshot`.
    ///
    /// Settings are defaults and the confluence verdict is unknown until
    /// checked.
    ///
    /// # Errors
    /// Returns [`KnuthBendixError::InvalidSnapshot`] when the alphabet or a
    /// word does not encode, when a rule's reducible side is not
    /// shortlex-greater than its replacement, or when one reducible side
    /// contains another.
    pub fn from_snapshot(snapshot: &RuleSetSnapshot) -> Result<Self, KnuthBendixError> {
        let invalid = |e: KnuthBendixError| KnuthBendixError::InvalidSnapshot(e.to_string());
        let alphabet = Alphabet::new(&snapshot.alphabet).map_err(invalid)?;
        let rules: Vec<(Word, Word)> = snapshot
            .rules
            .iter()
            .map(|(lhs, rhs)| Ok((alphabet.encode(lhs)?, alphabet.encode(rhs)?)))
            .collect::<Result<_, KnuthBendixError>>()
            .map_err(invalid)?;

        for (n, (lhs, rhs)) in rules.iter().enumerate() {
            if shortlex_cmp(lhs, rhs).is_le() {
                return Err(KnuthBendixError::InvalidSnapshot(format!(
                    "rule {n} ({:?} -> {:?}) is not oriented",
                    snapshot.rules[n].0, snapshot.rules[n].1
                )));
            }
        }
        for (i, (inner, _)) in rules.iter().enumerate() {
            for (j, (outer, _)) in rules.iter().enumerate() {
                if i != j && is_subword(inner, outer) {
                    return Err(KnuthBendixError::InvalidSnapshot(format!(
                        "reducible side of rule {j} contains that of rule {i}"
                    )));
                }
            }
        }

        let mut kb = Self::with_alphabet(alphabet);
        for (lhs, rhs) in &rules {
            let id = kb.rules.new_rule(lhs, rhs);
            kb.activate(id);
        }
        kb.next_outer = None;
        kb.next_inner = None;
        Ok(kb)
    }
}
