// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Left-to-right rewriting against the active rule set.
use crate::index::RuleIndex;
use crate::rule::RuleArena;
use crate::word::Word;

/// Reduces `word` in place with the rules held in `index`.
///
/// The buffer is split by two cursors: `word[..v_end]` is the reduced prefix
/// and `word[w_begin..]` is the suffix still to be read. Each step moves one
/// letter across, then looks for an active reducible side ending the prefix;
/// a hit pops that side off the prefix and pushes the replacement back in
/// front of the unread suffix. Replacements are never longer than what they
/// replace, so `v_end <= w_begin` holds throughout and the buffer never grows.
///
/// `min_lhs_len` must not exceed the shortest reducible side in `index`;
/// prefixes shorter than it are filled without probing.
pub(crate) fn rewrite_from_left(
    word: &mut Word,
    rules: &RuleArena,
    index: &RuleIndex,
    min_lhs_len: usize,
) {
    if index.len() == 0 || word.len() < min_lhs_len {
        return;
    }
    debug_assert!(min_lhs_len > 0);
    let w_end = word.len();
    let mut v_end = min_lhs_len - 1;
    let mut w_begin = v_end;

    while w_begin != w_end {
        word[v_end] = word[w_begin];
        v_end += 1;
        w_begin += 1;

        if let Some(id) = index.find_suffix_match(&word[..v_end], rules) {
            let rhs = rules.rhs(id);
            v_end -= rules.lhs(id).len();
            w_begin -= rhs.len();
            word[w_begin..w_begin + rhs.len()].copy_from_slice(rhs);
        }

        while w_begin != w_end && v_end + 1 < min_lhs_len {
            word[v_end] = word[w_begin];
            v_end += 1;
            w_begin += 1;
        }
    }
    word.truncate(v_end);
}
