// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rule storage.
//!
//! Every rule lives in one slot of a [`RuleArena`] and is addressed by a
//! [`RuleId`]. A rule is owned by exactly one of three places at a time: the
//! pending stack, the active list, or the inactive pool kept inside the arena.
//! Ownership moves by moving the id; nothing holds two copies of a handle.
//!
//! Each slot carries a generation counter that is bumped whenever the rule
//! leaves the active set. An overlap scan records the generations of the two
//! rules it is reading and abandons the scan once either changes.
use std::mem;

use crate::word::{shortlex_cmp, Letter, Word};

/// Handle to a rule slot in a [`RuleArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub(crate) struct RuleId(u32);

impl RuleId {
    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

/// Where a rule currently lives.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum RuleState {
    /// On the pending stack (or being built for it).
    Pending,
    /// In the active list and the rule index.
    Active,
    /// Parked in the inactive pool for reuse.
    Inactive,
}

/// An oriented pair of words plus bookkeeping.
#[derive(Debug, Clone)]
pub(crate) struct Rule {
    /// Reducible side; shortlex-greater than `rhs` while active.
    pub(crate) lhs: Word,
    /// Replacement side.
    pub(crate) rhs: Word,
    /// Creation order, unique across the arena's lifetime.
    pub(crate) serial: u64,
    /// Bumped whenever the rule leaves the active set.
    pub(crate) generation: u64,
    pub(crate) state: RuleState,
}

impl Rule {
    fn empty() -> Self {
        Self {
            lhs: Word::new(),
            rhs: Word::new(),
            serial: 0,
            generation: 0,
            state: RuleState::Inactive,
        }
    }

    /// Swaps the sides if needed so that `lhs` is the shortlex-larger word.
    pub(crate) fn orient(&mut self) {
        if shortlex_cmp(&self.lhs, &self.rhs).is_lt() {
            mem::swap(&mut self.lhs, &mut self.rhs);
        }
    }

    pub(crate) fn is_trivial(&self) -> bool {
        self.lhs == self.rhs
    }
}

/// Slot arena with a free list of inactive rules.
///
/// Slots are never shrunk; retired rules keep their word buffers so the next
/// rule built in that slot reuses the allocation.
#[derive(Debug, Default, Clone)]
pub(crate) struct RuleArena {
    slots: Vec<Rule>,
    inactive: Vec<RuleId>,
    defined: u64,
}

impl RuleArena {
    /// Takes a slot from the inactive pool (or allocates one) and returns it
    /// empty, in the pending state, with a fresh serial.
    pub(crate) fn acquire(&mut self) -> RuleId {
        self.defined += 1;
        let id = if let Some(id) = self.inactive.pop() {
            id
        } else {
            let Ok(raw) = u32::try_from(self.slots.len()) else {
                unreachable!("rule arena exceeded u32::MAX slots");
            };
            self.slots.push(Rule::empty());
            RuleId(raw)
        };
        let rule = &mut self.slots[id.slot()];
        debug_assert_eq!(rule.state, RuleState::Inactive);
        rule.lhs.clear();
        rule.rhs.clear();
        rule.serial = self.defined;
        rule.state = RuleState::Pending;
        id
    }

    /// Builds a pending rule from two words (no orientation applied).
    pub(crate) fn new_rule(&mut self, lhs: &[Letter], rhs: &[Letter]) -> RuleId {
        let id = self.acquire();
        let rule = &mut self.slots[id.slot()];
        rule.lhs.extend_from_slice(lhs);
        rule.rhs.extend_from_slice(rhs);
        id
    }

    /// Builds a pending copy of `src`.
    pub(crate) fn copy_rule(&mut self, src: RuleId) -> RuleId {
        let id = self.acquire();
        self.fill(id, |rules, lhs, rhs| {
            let src = rules.get(src);
            lhs.extend_from_slice(&src.lhs);
            rhs.extend_from_slice(&src.rhs);
        });
        id
    }

    /// Lends the word buffers of `id` to `f` together with a shared view of
    /// the arena, so a rule can be assembled from pieces of other rules.
    pub(crate) fn fill(&mut self, id: RuleId, f: impl FnOnce(&Self, &mut Word, &mut Word)) {
        let mut lhs = mem::take(&mut self.slots[id.slot()].lhs);
        let mut rhs = mem::take(&mut self.slots[id.slot()].rhs);
        f(&*self, &mut lhs, &mut rhs);
        let rule = &mut self.slots[id.slot()];
        rule.lhs = lhs;
        rule.rhs = rhs;
    }

    /// Returns a rule to the inactive pool.
    pub(crate) fn retire(&mut self, id: RuleId) {
        let rule = &mut self.slots[id.slot()];
        debug_assert_ne!(rule.state, RuleState::Inactive, "rule retired twice");
        if rule.state == RuleState::Active {
            rule.generation += 1;
        }
        rule.state = RuleState::Inactive;
        self.inactive.push(id);
    }

    pub(crate) fn set_active(&mut self, id: RuleId) {
        self.slots[id.slot()].state = RuleState::Active;
    }

    /// Moves an active rule back to the pending state.
    pub(crate) fn set_pending(&mut self, id: RuleId) {
        let rule = &mut self.slots[id.slot()];
        if rule.state == RuleState::Active {
            rule.generation += 1;
        }
        rule.state = RuleState::Pending;
    }

    pub(crate) fn get(&self, id: RuleId) -> &Rule {
        &self.slots[id.slot()]
    }

    pub(crate) fn get_mut(&mut self, id: RuleId) -> &mut Rule {
        &mut self.slots[id.slot()]
    }

    pub(crate) fn is_active(&self, id: RuleId) -> bool {
        self.get(id).state == RuleState::Active
    }

    pub(crate) fn generation(&self, id: RuleId) -> u64 {
        self.get(id).generation
    }

    pub(crate) fn lhs(&self, id: RuleId) -> &[Letter] {
        &self.get(id).lhs
    }

    pub(crate) fn rhs(&self, id: RuleId) -> &[Letter] {
        &self.get(id).rhs
    }

    /// Size of the inactive pool.
    pub(crate) fn inactive_len(&self) -> usize {
        self.inactive.len()
    }

    /// Number of rules ever created, including reused slots.
    pub(crate) fn defined(&self) -> u64 {
        self.defined
    }
}
