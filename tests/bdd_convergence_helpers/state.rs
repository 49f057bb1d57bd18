//! Scenario state for convergence behavioural tests.

use std::time::Duration;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// How a poll ended.
#[derive(Debug, Clone)]
pub(crate) enum PollOutcome {
    Converged,
    Exhausted { attempts: usize, last_error: String },
    NoAttempt,
}

#[derive(Default, ScenarioState)]
pub(crate) struct ConvergenceState {
    pub(crate) interval_ms: Slot<u64>,
    /// 1-based attempt on which the probe first succeeds; zero means never.
    pub(crate) succeed_on: Slot<usize>,
    pub(crate) outcome: Slot<PollOutcome>,
    pub(crate) calls: Slot<usize>,
    pub(crate) elapsed: Slot<Duration>,
}

#[fixture]
pub(crate) fn convergence_state() -> ConvergenceState {
    ConvergenceState::default()
}
