// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Internal letters, words, and the orders used to compare them.
//!
//! Ordering contract
//! - Rules are oriented by shortlex: length first, then lexicographic by
//!   internal letter value. Letter values follow alphabet position, so the
//!   internal order matches the order in which the alphabet was declared.
//! - The rule index compares reducible sides with [`suffix_cmp`], a
//!   reverse-lexicographic scan from the last letter in which running out of
//!   either operand counts as equality.
use std::cmp::Ordering;

/// Compact internal symbol. The value is the letter's position in its alphabet.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Letter(pub u8);

impl Letter {
    /// Returns the alphabet position of this letter.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Owned internal word.
pub type Word = Vec<Letter>;

/// Shortlex comparison: shorter words are smaller; equal lengths compare
/// lexicographically.
pub fn shortlex_cmp(u: &[Letter], v: &[Letter]) -> Ordering {
    u.len().cmp(&v.len()).then_with(|| u.cmp(v))
}

/// Reverse-lexicographic comparison with suffix equivalence.
///
/// Scans both words from their last letter towards their first. The first
/// differing letter decides the order; if either word runs out first the two
/// are considered equal, so a short query compares equal to every key that
/// ends with it (and vice versa).
pub(crate) fn suffix_cmp(key: &[Letter], query: &[Letter]) -> Ordering {
    key.iter()
        .rev()
        .zip(query.iter().rev())
        .map(|(a, b)| a.cmp(b))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Returns `true` when `needle` occurs as a contiguous subword of `hay`.
pub(crate) fn is_subword(needle: &[Letter], hay: &[Letter]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > hay.len() {
        return false;
    }
    hay.windows(needle.len()).any(|w| w == needle)
}

/// Length of the longest common prefix of `u` and `v`.
pub(crate) fn common_prefix_len(u: &[Letter], v: &[Letter]) -> usize {
    u.iter().zip(v).take_while(|(a, b)| a == b).count()
}
