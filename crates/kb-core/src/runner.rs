// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cooperative run control: stop requests, deadlines, progress pacing.
use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Cloneable flag that asks an in-progress run to suspend.
///
/// The engine polls the flag between overlap and rule operations; after a
/// request the current run returns [`RunOutcome::Interrupted`] with all state
/// consistent, and the next run resumes from it. The flag is cleared when a
/// new run starts.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Requests cooperative suspension of the current run.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether a stop has been requested since the current run started.
    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Pending stack empty and every critical pair resolves.
    Confluent,
    /// A rule-count or overlap bound kept the run from concluding.
    Bounded,
    /// A stop request or deadline suspended the run.
    Interrupted,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Confluent => "confluent",
            Self::Bounded => "bounded",
            Self::Interrupted => "interrupted",
        })
    }
}

/// Per-run bookkeeping owned by the engine.
///
/// A deadline only counts once the run has done some work, so every run
/// makes progress however small its budget. Stop requests apply at once.
#[derive(Debug, Default)]
pub(crate) struct RunControl {
    stop: StopHandle,
    deadline: Option<Instant>,
    running: bool,
    worked: Cell<bool>,
    next_report: Option<Instant>,
}

impl RunControl {
    pub(crate) fn handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub(crate) fn begin(&mut self, budget: Option<Duration>) {
        let now = Instant::now();
        self.stop.clear();
        self.deadline = budget.map(|b| now + b);
        self.running = true;
        self.worked.set(false);
        self.next_report = Some(now + REPORT_INTERVAL);
    }

    pub(crate) fn end(&mut self) {
        self.running = false;
        self.deadline = None;
        self.next_report = None;
    }

    pub(crate) fn running(&self) -> bool {
        self.running
    }

    /// Stop requested or deadline passed.
    pub(crate) fn interrupted(&self) -> bool {
        self.stop_requested() || self.deadline_passed()
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop.is_stop_requested()
    }

    /// Whether the run should suspend at the next consistent point.
    pub(crate) fn should_stop(&self) -> bool {
        self.stop_requested() || (self.worked.get() && self.deadline_passed())
    }

    /// Marks one unit of progress (a drained candidate, an overlap position,
    /// a finished confluence scan).
    pub(crate) fn record_work(&self) {
        self.worked.set(true);
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// True at most once per report interval.
    pub(crate) fn report_due(&mut self) -> bool {
        match self.next_report {
            Some(at) if Instant::now() >= at => {
                self.next_report = Some(at + REPORT_INTERVAL);
                true
            }
            _ => false,
        }
    }
}
