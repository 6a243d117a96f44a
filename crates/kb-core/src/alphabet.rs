// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bidirectional codec between external characters and internal letters.
use rustc_hash::FxHashMap;

use crate::error::KnuthBendixError;
use crate::word::{Letter, Word};

const MAX_LETTERS: usize = 256;

/// Ordered alphabet. A character's position is its internal letter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    letters: Vec<char>,
    index: FxHashMap<char, Letter>,
}

impl Alphabet {
    /// Builds an alphabet from the characters of `letters`, in order.
    ///
    /// # Errors
    /// Returns [`KnuthBendixError::DuplicateLetter`] if a character repeats, or
    /// [`KnuthBendixError::AlphabetTooLarge`] if there are more than 256.
    pub fn new(letters: &str) -> Result<Self, KnuthBendixError> {
        let letters: Vec<char> = letters.chars().collect();
        if letters.len() > MAX_LETTERS {
            return Err(KnuthBendixError::AlphabetTooLarge(letters.len()));
        }
        let mut index = FxHashMap::default();
        for (pos, &c) in letters.iter().enumerate() {
            let Ok(value) = u8::try_from(pos) else {
                return Err(KnuthBendixError::AlphabetTooLarge(letters.len()));
            };
            if index.insert(c, Letter(value)).is_some() {
                return Err(KnuthBendixError::DuplicateLetter(c));
            }
        }
        Ok(Self { letters, index })
    }

    /// Number of letters.
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Whether the alphabet has no letters.
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// The external characters in alphabet order.
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// Internal letter for `c`, if `c` belongs to the alphabet.
    pub fn letter(&self, c: char) -> Option<Letter> {
        self.index.get(&c).copied()
    }

    /// Encodes an external word.
    ///
    /// # Errors
    /// Returns [`KnuthBendixError::InvalidSymbol`] for the first character not
    /// in the alphabet.
    pub fn encode(&self, word: &str) -> Result<Word, KnuthBendixError> {
        word.chars()
            .map(|c| {
                self.letter(c).ok_or_else(|| KnuthBendixError::InvalidSymbol {
                    symbol: c,
                    alphabet: self.to_string(),
                })
            })
            .collect()
    }

    /// Decodes an internal word. Internal words only ever hold letters of this
    /// alphabet, so decoding cannot fail.
    pub fn decode(&self, word: &[Letter]) -> String {
        word.iter().map(|l| self.letters[l.index()]).collect()
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.letters.iter().try_for_each(|c| write!(f, "{c}"))
    }
}
