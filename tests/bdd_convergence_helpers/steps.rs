//! Given/when steps for convergence scenarios.

use std::time::Duration;

use rstest_bdd_macros::{given, when};
use swarm_e2e::converge::ConvergencePoller;
use swarm_e2e::error::ConvergeError;
use tokio::time::Instant;

use super::StepResult;
use super::state::{ConvergenceState, PollOutcome};

#[given("a poll interval of {interval_ms} milliseconds")]
fn given_poll_interval(convergence_state: &ConvergenceState, interval_ms: u64) {
    convergence_state.interval_ms.set(interval_ms);
}

#[given("a probe that succeeds on attempt {attempt}")]
fn given_probe_succeeds_on(convergence_state: &ConvergenceState, attempt: usize) {
    convergence_state.succeed_on.set(attempt);
}

#[given("a probe that never succeeds")]
fn given_probe_never_succeeds(convergence_state: &ConvergenceState) {
    convergence_state.succeed_on.set(0);
}

#[when("the poller waits with a deadline of {deadline_ms} milliseconds")]
fn when_poller_waits(convergence_state: &ConvergenceState, deadline_ms: u64) -> StepResult<()> {
    let interval_ms = convergence_state
        .interval_ms
        .get()
        .ok_or_else(|| String::from("poll interval should be configured"))?;
    let succeed_on = convergence_state.succeed_on.get().unwrap_or(0);

    let poller = ConvergencePoller::new(Duration::from_millis(interval_ms))
        .map_err(|e| format!("failed to build poller: {e}"))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .map_err(|e| format!("failed to create runtime: {e}"))?;

    let mut calls = 0_usize;
    let (result, elapsed) = runtime.block_on(async {
        let started = Instant::now();
        let polled = poller
            .wait_for(Duration::from_millis(deadline_ms), || {
                calls += 1;
                let outcome = if succeed_on != 0 && calls >= succeed_on {
                    Ok(())
                } else {
                    Err(format!("attempt {calls} not converged"))
                };
                std::future::ready(outcome)
            })
            .await;
        (polled, started.elapsed())
    });

    let outcome = match result {
        Ok(()) => PollOutcome::Converged,
        Err(ConvergeError::Exhausted { attempts, source }) => PollOutcome::Exhausted {
            attempts,
            last_error: source,
        },
        Err(ConvergeError::NoAttempt) => PollOutcome::NoAttempt,
    };

    convergence_state.outcome.set(outcome);
    convergence_state.calls.set(calls);
    convergence_state.elapsed.set(elapsed);
    Ok(())
}
