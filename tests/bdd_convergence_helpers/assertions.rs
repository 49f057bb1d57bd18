//! Assertion steps for convergence scenarios.

use std::time::Duration;

use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{ConvergenceState, PollOutcome};

fn outcome(convergence_state: &ConvergenceState) -> StepResult<PollOutcome> {
    convergence_state
        .outcome
        .get()
        .ok_or_else(|| String::from("poll outcome should be set"))
}

#[then("the poll succeeds")]
fn poll_succeeds(convergence_state: &ConvergenceState) -> StepResult<()> {
    match outcome(convergence_state)? {
        PollOutcome::Converged => Ok(()),
        other => Err(format!("expected convergence, got {other:?}")),
    }
}

#[then("the poll fails after {expected} attempts")]
fn poll_fails_after(convergence_state: &ConvergenceState, expected: usize) -> StepResult<()> {
    match outcome(convergence_state)? {
        PollOutcome::Exhausted { attempts, .. } if attempts == expected => Ok(()),
        other => Err(format!(
            "expected failure after {expected} attempts, got {other:?}"
        )),
    }
}

#[then("the poll fails without any attempt")]
fn poll_fails_without_attempt(convergence_state: &ConvergenceState) -> StepResult<()> {
    match outcome(convergence_state)? {
        PollOutcome::NoAttempt => Ok(()),
        other => Err(format!("expected no attempt, got {other:?}")),
    }
}

#[then("the failure wraps the error from attempt {attempt}")]
fn failure_wraps_attempt(convergence_state: &ConvergenceState, attempt: usize) -> StepResult<()> {
    let expected = format!("attempt {attempt} not converged");
    match outcome(convergence_state)? {
        PollOutcome::Exhausted { last_error, .. } if last_error == expected => Ok(()),
        other => Err(format!("expected last error '{expected}', got {other:?}")),
    }
}

#[then("the probe was called {expected} times")]
fn probe_called(convergence_state: &ConvergenceState, expected: usize) -> StepResult<()> {
    let calls = convergence_state
        .calls
        .get()
        .ok_or_else(|| String::from("call count should be set"))?;
    if calls == expected {
        Ok(())
    } else {
        Err(format!("expected {expected} probe calls, got {calls}"))
    }
}

#[then("{expected_ms} milliseconds have elapsed")]
fn milliseconds_elapsed(convergence_state: &ConvergenceState, expected_ms: u64) -> StepResult<()> {
    let elapsed = convergence_state
        .elapsed
        .get()
        .ok_or_else(|| String::from("elapsed time should be set"))?;
    if elapsed == Duration::from_millis(expected_ms) {
        Ok(())
    } else {
        Err(format!("expected {expected_ms} ms to elapse, got {elapsed:?}"))
    }
}
