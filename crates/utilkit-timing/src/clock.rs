//! Clock capability contract and the clocks shipped with the crate.
//!
//! A clock is anything that can report a current instant and measure the
//! span between two of its own instants. Timers never look inside an
//! instant; they only hand pairs of them back to the clock that produced them.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime};

use chrono::{DateTime, Utc};

/// Source of instants for every timer in this crate.
///
/// `between` must never be negative: clocks that can go backwards (wall
/// clocks) saturate to [`Duration::ZERO`].
pub trait Clock {
    /// Opaque point in time produced by [`Clock::now`].
    type Instant: Copy;

    /// Current instant.
    fn now(&self) -> Self::Instant;

    /// Span from `start` to `end`.
    fn between(&self, start: Self::Instant, end: Self::Instant) -> Duration;
}

/// Monotonic clock backed by [`std::time::Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn between(&self, start: Self::Instant, end: Self::Instant) -> Duration {
        end.saturating_duration_since(start)
    }
}

/// Wall clock backed by [`std::time::SystemTime`].
///
/// Not monotonic. A span across a backwards clock adjustment reads as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Instant = SystemTime;

    fn now(&self) -> Self::Instant {
        SystemTime::now()
    }

    fn between(&self, start: Self::Instant, end: Self::Instant) -> Duration {
        end.duration_since(start).unwrap_or(Duration::ZERO)
    }
}

/// UTC wall clock backed by `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcClock;

impl Clock for UtcClock {
    type Instant = DateTime<Utc>;

    fn now(&self) -> Self::Instant {
        Utc::now()
    }

    fn between(&self, start: Self::Instant, end: Self::Instant) -> Duration {
        (end - start).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Manually driven clock for deterministic measurements.
///
/// Clones share the same time source, so a test can keep one handle and
/// advance it while a timer holds another.
///
/// ```
/// use std::time::Duration;
/// use utilkit_timing::{ImmutableTimer, ManualClock, Milliseconds};
///
/// let clock = ManualClock::new();
/// let timer = ImmutableTimer::<_, Milliseconds>::with_clock(clock.clone());
/// clock.advance(Duration::from_millis(250));
/// assert_eq!(timer.elapsed().count(), 250);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Clock starting at offset zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `step`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn advance(&self, step: Duration) {
        let step = step.as_nanos().min(u128::from(u64::MAX)) as u64;
        self.nanos.fetch_add(step, Ordering::SeqCst);
    }

    /// Jump to an absolute offset from the clock's origin. May go backwards.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set(&self, offset: Duration) {
        let offset = offset.as_nanos().min(u128::from(u64::MAX)) as u64;
        self.nanos.store(offset, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    type Instant = Duration;

    fn now(&self) -> Self::Instant {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn between(&self, start: Self::Instant, end: Self::Instant) -> Duration {
        end.saturating_sub(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock;
        let a = clock.now();
        let b = clock.now();
        assert!(clock.between(a, b) >= Duration::ZERO);
        assert_eq!(clock.between(b, a), Duration::ZERO);
    }

    #[test]
    fn system_clock_saturates_reversed_span() {
        let clock = SystemClock;
        let later = SystemTime::now();
        let earlier = later - Duration::from_secs(5);
        assert_eq!(clock.between(later, earlier), Duration::ZERO);
        assert_eq!(clock.between(earlier, later), Duration::from_secs(5));
    }

    #[test]
    fn utc_clock_measures_chrono_span() {
        let clock = UtcClock;
        let start = clock.now();
        let end = start + chrono::Duration::milliseconds(1500);
        assert_eq!(clock.between(start, end), Duration::from_millis(1500));
        assert_eq!(clock.between(end, start), Duration::ZERO);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let start = clock.now();
        handle.advance(Duration::from_micros(40));
        assert_eq!(clock.between(start, clock.now()), Duration::from_micros(40));

        handle.set(Duration::ZERO);
        assert_eq!(clock.now(), Duration::ZERO);
    }
}
