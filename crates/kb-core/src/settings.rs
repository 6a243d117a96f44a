// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tunables for a completion run.
use serde::{Deserialize, Serialize};

use crate::overlap::OverlapPolicy;

/// Default number of overlaps processed between periodic confluence checks.
pub const DEFAULT_CHECK_CONFLUENCE_INTERVAL: usize = 4096;

/// Completion settings.
///
/// Every field has a default, so a partial JSON object (or `{}`) deserializes.
/// Bounds set through [`crate::KnuthBendix::run_bounded`] are stored here and
/// persist across later runs until changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overlaps processed between periodic confluence checks. `usize::MAX`
    /// disables the periodic check.
    pub check_confluence_interval: usize,
    /// Upper bound on the overlap measure; `None` is unbounded.
    pub max_overlap: Option<usize>,
    /// Upper bound on the number of active rules; `None` is unbounded.
    pub max_rules: Option<usize>,
    /// How overlaps are scored against `max_overlap`.
    pub overlap_policy: OverlapPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check_confluence_interval: DEFAULT_CHECK_CONFLUENCE_INTERVAL,
            max_overlap: None,
            max_rules: None,
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

impl Settings {
    /// Whether any bound is configured. Only unbounded runs may conclude
    /// confluence without running the checker.
    pub fn is_bounded(&self) -> bool {
        self.max_overlap.is_some() || self.max_rules.is_some()
    }
}
