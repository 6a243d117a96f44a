// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Monoid presentations: an alphabet plus defining relations.
use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::error::KnuthBendixError;
use crate::word::Word;

/// Alphabet and relations as external strings.
///
/// Serialized as `{"alphabet": "ab", "rules": [["aa", ""], ...]}`. The empty
/// string denotes the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    /// Letters in order; each character is one generator.
    pub alphabet: String,
    /// Defining relations `(u, v)` asserting `u = v`.
    #[serde(default)]
    pub rules: Vec<(String, String)>,
}

impl Presentation {
    /// Creates a presentation with no relations.
    pub fn new(alphabet: impl Into<String>) -> Self {
        Self {
            alphabet: alphabet.into(),
            rules: Vec::new(),
        }
    }

    /// Appends the relation `lhs = rhs`.
    pub fn with_rule(mut self, lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        self.rules.push((lhs.into(), rhs.into()));
        self
    }

    /// Checks the alphabet and every relation, returning the alphabet codec
    /// and the encoded relations in order.
    ///
    /// # Errors
    /// Propagates alphabet construction errors and
    /// [`KnuthBendixError::InvalidSymbol`] for relations using foreign letters.
    pub fn validate(&self) -> Result<(Alphabet, Vec<(Word, Word)>), KnuthBendixError> {
        let alphabet = Alphabet::new(&self.alphabet)?;
        let relations = self
            .rules
            .iter()
            .map(|(u, v)| Ok((alphabet.encode(u)?, alphabet.encode(v)?)))
            .collect::<Result<Vec<_>, KnuthBendixError>>()?;
        Ok((alphabet, relations))
    }
}
