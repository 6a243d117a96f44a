// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Errors raised at the boundary of the completion engine.
//!
//! Words are validated once when they enter the engine; everything downstream
//! works on internal letters and cannot fail. Broken internal invariants are
//! assertion failures, not variants of this type.
use thiserror::Error;

/// Errors emitted by the completion engine and its codecs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KnuthBendixError {
    /// A word contained a character outside the configured alphabet.
    #[error("symbol {symbol:?} is not in the alphabet {alphabet:?}")]
    InvalidSymbol {
        /// The offending character.
        symbol: char,
        /// The alphabet the word was checked against.
        alphabet: String,
    },
    /// The alphabet lists the same letter more than once.
    #[error("letter {0:?} occurs more than once in the alphabet")]
    DuplicateLetter(char),
    /// The alphabet does not fit in the internal letter type.
    #[error("alphabet has {0} letters; at most 256 are supported")]
    AlphabetTooLarge(usize),
    /// A result was requested that presupposes a confluent system.
    #[error("not ready: {0}")]
    NotReady(&'static str),
    /// A persisted rule set could not be re-activated.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
