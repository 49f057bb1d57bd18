//! Polling for convergence of externally observed state.
//!
//! End-to-end tests against an orchestrator rarely observe the target state
//! immediately after issuing a request. [`ConvergencePoller`] runs a
//! caller-supplied probe once per interval until the probe succeeds or a
//! deadline fires, whichever comes first.
//!
//! The deadline is any future that resolves when the caller wants to give up:
//! `tokio::time::sleep(..)`, a cancellation token's `cancelled()` future, or a
//! oneshot receiver mapped to `()`. If the deadline never resolves and the
//! probe never succeeds, the poller waits forever; bounding it is the
//! caller's job.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use swarm_e2e::converge::ConvergencePoller;
//!
//! let poller = ConvergencePoller::new(Duration::from_millis(250))?;
//! poller
//!     .wait_for(Duration::from_secs(30), || async { check_replicas().await })
//!     .await?;
//! ```

mod ticker;

use std::fmt;
use std::future::{self, Future};
use std::pin::pin;
use std::time::Duration;

use tracing::{debug, trace};

use self::ticker::{IntervalTicker, TickSource};
use crate::error::{ConfigError, ConvergeError, HarnessError};

/// Retries a probe on a fixed interval until it succeeds or a deadline fires.
///
/// The first probe runs one full interval after the wait starts. Invocations
/// are strictly sequential: the next tick is not awaited until the previous
/// probe future has completed, so probes need not be reentrant. Ticks missed
/// while a slow probe runs are skipped rather than replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergencePoller {
    interval: Duration,
}

impl ConvergencePoller {
    /// Create a poller that probes once per `interval`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `interval` is zero.
    pub fn new(interval: Duration) -> Result<Self, HarnessError> {
        if interval.is_zero() {
            return Err(HarnessError::from(ConfigError::InvalidValue {
                field: String::from("interval"),
                reason: String::from("poll interval must be greater than zero"),
            }));
        }

        Ok(Self { interval })
    }

    /// Return the delay between probe invocations.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Probe until success or until `deadline` resolves.
    ///
    /// Returns `Ok(())` as soon as a probe succeeds. When the deadline wins
    /// the race against the next tick, the most recent probe failure is
    /// returned inside [`ConvergeError::Exhausted`]. A deadline that fires on
    /// the same instant as a tick takes precedence. A running probe is never
    /// interrupted; the deadline is only observed between attempts.
    ///
    /// # Errors
    ///
    /// Returns `ConvergeError::Exhausted` with the last probe failure, or
    /// `ConvergeError::NoAttempt` when the deadline fires before the first
    /// probe completes.
    pub async fn wait<D, P, Fut, E>(&self, deadline: D, probe: P) -> Result<(), ConvergeError<E>>
    where
        D: Future<Output = ()>,
        P: FnMut() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        poll_until(IntervalTicker::start(self.interval), deadline, probe).await
    }

    /// Probe until success or until `timeout` has elapsed.
    ///
    /// # Errors
    ///
    /// See [`Self::wait`].
    pub async fn wait_for<P, Fut, E>(
        &self,
        timeout: Duration,
        probe: P,
    ) -> Result<(), ConvergeError<E>>
    where
        P: FnMut() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        self.wait(tokio::time::sleep(timeout), probe).await
    }

    /// Probe a blocking check until success or until `timeout` has elapsed.
    ///
    /// This synchronous helper blocks on [`Self::wait_for`] using an existing
    /// Tokio runtime handle supplied by the caller. The handle must belong to
    /// a multi-thread runtime (or a current-thread runtime driven elsewhere)
    /// so its timer keeps running, and it must not be called from within an
    /// async context.
    ///
    /// # Errors
    ///
    /// See [`Self::wait`].
    pub fn wait_blocking<P, E>(
        &self,
        runtime: &tokio::runtime::Handle,
        timeout: Duration,
        mut probe: P,
    ) -> Result<(), ConvergeError<E>>
    where
        P: FnMut() -> Result<(), E>,
        E: fmt::Display,
    {
        runtime.block_on(self.wait_for(timeout, || future::ready(probe())))
    }
}

/// Core polling loop, generic over the tick source so the timer's lifetime
/// can be observed in tests.
///
/// The ticker is owned by this function and dropped on every return path.
#[expect(
    clippy::integer_division_remainder_used,
    reason = "false positive triggered inside tokio::select! expansion"
)]
async fn poll_until<T, D, P, Fut, E>(
    mut ticker: T,
    deadline: D,
    mut probe: P,
) -> Result<(), ConvergeError<E>>
where
    T: TickSource,
    D: Future<Output = ()>,
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: fmt::Display,
{
    let mut deadline_fut = pin!(deadline);
    let mut last_error: Option<E> = None;
    let mut attempts: usize = 0;

    loop {
        tokio::select! {
            biased;

            () = &mut deadline_fut => {
                debug!(attempts, "deadline reached before convergence");
                return Err(last_error.map_or(ConvergeError::NoAttempt, |source| {
                    ConvergeError::Exhausted { attempts, source }
                }));
            }
            () = ticker.tick() => {}
        }

        attempts = attempts.saturating_add(1);
        match probe().await {
            Ok(()) => {
                debug!(attempts, "probe converged");
                return Ok(());
            }
            Err(error) => {
                trace!(attempt = attempts, %error, "probe has not converged yet");
                last_error = Some(error);
            }
        }
    }
}
