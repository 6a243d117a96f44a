// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Suffix lookup over the reducible sides of active rules.
//!
//! Entries are rule handles kept sorted by [`suffix_cmp`] on their reducible
//! sides. Active reducible sides never contain one another, so no stored key
//! is a suffix of another and the order is total over the stored set. A query
//! window compares equal to a key when one ends with the other; because of the
//! subword-freeness at most one stored key can be a suffix of the window, and
//! every key that the window is a suffix of sits in the same contiguous run.
//! Binary search therefore lands on the matching key when one exists.
use crate::rule::{RuleArena, RuleId};
use crate::word::{suffix_cmp, Letter};

/// Sorted index of active rules keyed by reducible side.
#[derive(Debug, Default, Clone)]
pub(crate) struct RuleIndex {
    entries: Vec<RuleId>,
}

impl RuleIndex {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn insert(&mut self, id: RuleId, rules: &RuleArena) {
        let key = rules.lhs(id);
        match self
            .entries
            .binary_search_by(|&e| suffix_cmp(rules.lhs(e), key))
        {
            Ok(pos) => {
                let clash = self.entries[pos];
                panic_on_clash(rules, id, clash);
            }
            Err(pos) => self.entries.insert(pos, id),
        }
    }

    pub(crate) fn remove(&mut self, id: RuleId, rules: &RuleArena) {
        let key = rules.lhs(id);
        let found = self
            .entries
            .binary_search_by(|&e| suffix_cmp(rules.lhs(e), key));
        match found {
            Ok(pos) if self.entries[pos] == id => {
                self.entries.remove(pos);
            }
            _ => unreachable!("removing a rule that is not indexed"),
        }
    }

    /// Active rule whose reducible side is a suffix of `window`, if any.
    pub(crate) fn find_suffix_match(&self, window: &[Letter], rules: &RuleArena) -> Option<RuleId> {
        let pos = self
            .entries
            .binary_search_by(|&e| suffix_cmp(rules.lhs(e), window))
            .ok()?;
        let id = self.entries[pos];
        (rules.lhs(id).len() <= window.len()).then_some(id)
    }
}

#[cold]
fn panic_on_clash(rules: &RuleArena, id: RuleId, clash: RuleId) -> ! {
    unreachable!(
        "index key clash: {:?} is suffix-equivalent to active {:?}",
        rules.lhs(id),
        rules.lhs(clash)
    )
}
