//! Start/stop timer that keeps the most recent `N` timings.

use std::time::Duration;

use crate::clock::{Clock, MonotonicClock};

/// Retains the last `N` start-to-stop timings and reports their average.
///
/// `stop` measures from the latest `start`; stopping twice without a new
/// `start` records two timings from the same origin. Once `N` timings are
/// held, each new one overwrites the oldest.
///
/// ```
/// use std::time::Duration;
/// use utilkit_timing::{ManualClock, StatsTimer};
///
/// let clock = ManualClock::new();
/// let mut stats = StatsTimer::<4, _>::with_clock(clock.clone());
/// for ms in [10, 20, 30] {
///     stats.start();
///     clock.advance(Duration::from_millis(ms));
///     stats.stop();
/// }
/// assert_eq!(stats.average_ms(), 20);
/// ```
pub struct StatsTimer<const N: usize, C: Clock = MonotonicClock> {
    clock: C,
    started: Option<C::Instant>,
    timings: [Duration; N],
    next: usize,
    recorded: usize,
}

impl<const N: usize, C: Clock + Default> StatsTimer<N, C> {
    pub fn new() -> Self {
        Self::with_clock(C::default())
    }
}

impl<const N: usize, C: Clock> StatsTimer<N, C> {
    pub fn with_clock(clock: C) -> Self {
        const { assert!(N > 0, "StatsTimer needs room for at least one timing") };
        Self {
            clock,
            started: None,
            timings: [Duration::ZERO; N],
            next: 0,
            recorded: 0,
        }
    }

    /// Mark the beginning of a timed section.
    pub fn start(&mut self) {
        self.started = Some(self.clock.now());
    }

    /// Record the time since the last `start`.
    ///
    /// Returns `None` and records nothing if `start` was never called.
    pub fn stop(&mut self) -> Option<Duration> {
        let started = self.started?;
        let elapsed = self.clock.between(started, self.clock.now());
        self.timings[self.next] = elapsed;
        self.next = (self.next + 1) % N;
        self.recorded = (self.recorded + 1).min(N);
        Some(elapsed)
    }

    /// Forget all recorded timings. A pending `start` is kept.
    pub fn reset(&mut self) {
        self.timings = [Duration::ZERO; N];
        self.next = 0;
        self.recorded = 0;
    }

    /// Retained timings, in slot order rather than chronological order.
    pub fn samples(&self) -> &[Duration] {
        &self.timings[..self.recorded]
    }

    /// Mean of the retained timings, zero when none are held.
    pub fn average(&self) -> Duration {
        let samples = self.samples();
        if samples.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = samples.iter().sum();
        total / u32::try_from(samples.len()).unwrap_or(u32::MAX)
    }

    /// Mean of the retained timings in whole milliseconds.
    pub fn average_ms(&self) -> i64 {
        i64::try_from(self.average().as_millis()).unwrap_or(i64::MAX)
    }
}

impl<const N: usize, C: Clock + Default> Default for StatsTimer<N, C> {
    fn default() -> Self {
        Self::new()
    }
}
