//! Periodic tick sources driving the convergence loop.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// First-tick horizon used when `now + period` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// A periodic timer that the polling loop awaits between probe attempts.
///
/// Implementors own whatever scheduling resource backs the timer and release
/// it when dropped.
pub(super) trait TickSource {
    /// Wait for the next tick.
    fn tick(&mut self) -> impl Future<Output = ()> + Send;
}

/// Tick source backed by a Tokio [`Interval`].
///
/// The first tick fires one full period after construction, never
/// immediately. Missed ticks are skipped so a slow probe is followed by at
/// most one immediate attempt.
#[derive(Debug)]
pub(super) struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    /// Start a ticker with the given non-zero period.
    ///
    /// Periods too long to add to the current instant start at a far-future
    /// instant instead, so the ticker simply never fires in practice.
    pub(super) fn start(period: Duration) -> Self {
        let now = Instant::now();
        let first_tick = now
            .checked_add(period)
            .unwrap_or_else(|| now + FAR_FUTURE);
        let mut interval = time::interval_at(first_tick, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

impl TickSource for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
