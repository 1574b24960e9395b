//! Elapsed-time timers.
//!
//! [`ImmutableTimer`] measures from a fixed start captured at construction and
//! can never be restarted, which makes it safe to hand out as "time since X".
//! [`ResettableTimer`] adds [`ResettableTimer::reset`] for reuse. Both report
//! in a unit fixed by their type; other units are available on request.

use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use crate::clock::{Clock, MonotonicClock};
use crate::unit::{DurationUnit, Microseconds, Milliseconds, Nanoseconds, Span};

/// Clock plus the instant measurements are taken from.
pub(crate) struct Epoch<C: Clock> {
    clock: C,
    start: C::Instant,
}

impl<C: Clock> Epoch<C> {
    pub(crate) fn begin(clock: C) -> Self {
        let start = clock.now();
        Self { clock, start }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.clock.between(self.start, self.clock.now())
    }

    pub(crate) fn restart(&mut self) {
        self.start = self.clock.now();
    }

    pub(crate) const fn start(&self) -> C::Instant {
        self.start
    }

    pub(crate) const fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock + fmt::Debug> fmt::Debug for Epoch<C>
where
    C::Instant: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Epoch")
            .field("clock", &self.clock)
            .field("start", &self.start)
            .finish()
    }
}

macro_rules! elapsed_accessors {
    () => {
        /// Time since the start, in the timer's unit.
        pub fn elapsed(&self) -> Span<U> {
            Span::from_duration(self.epoch.elapsed())
        }

        /// Time since the start, in another unit.
        pub fn elapsed_as<V: DurationUnit>(&self) -> Span<V> {
            Span::from_duration(self.epoch.elapsed())
        }

        /// Time since the start, at full clock resolution.
        pub fn elapsed_duration(&self) -> Duration {
            self.epoch.elapsed()
        }

        /// Whole milliseconds since the start.
        pub fn elapsed_ms(&self) -> i64 {
            self.elapsed_as::<Milliseconds>().count()
        }

        /// Whole microseconds since the start.
        pub fn elapsed_us(&self) -> i64 {
            self.elapsed_as::<Microseconds>().count()
        }

        /// Nanoseconds since the start.
        pub fn elapsed_ns(&self) -> i64 {
            self.elapsed_as::<Nanoseconds>().count()
        }

        /// The instant measurements are taken from.
        pub const fn started_at(&self) -> C::Instant {
            self.epoch.start()
        }

        pub const fn clock(&self) -> &C {
            self.epoch.clock()
        }
    };
}

/// Timer with a start fixed for its whole lifetime.
///
/// ```
/// use utilkit_timing::{ImmutableTimer, Microseconds, MonotonicClock};
///
/// let since_boot = ImmutableTimer::<MonotonicClock, Microseconds>::new();
/// let first = since_boot.elapsed();
/// let second = since_boot.elapsed();
/// assert!(second >= first);
/// ```
pub struct ImmutableTimer<C: Clock = MonotonicClock, U: DurationUnit = Milliseconds> {
    epoch: Epoch<C>,
    _unit: PhantomData<U>,
}

impl<C: Clock + Default, U: DurationUnit> ImmutableTimer<C, U> {
    /// Start measuring now.
    pub fn new() -> Self {
        Self::with_clock(C::default())
    }
}

impl<C: Clock, U: DurationUnit> ImmutableTimer<C, U> {
    /// Start measuring now, on `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            epoch: Epoch::begin(clock),
            _unit: PhantomData,
        }
    }

    elapsed_accessors!();
}

impl<C: Clock + Default, U: DurationUnit> Default for ImmutableTimer<C, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + fmt::Debug, U: DurationUnit> fmt::Debug for ImmutableTimer<C, U>
where
    C::Instant: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImmutableTimer")
            .field("epoch", &self.epoch)
            .field("unit", &U::SUFFIX)
            .finish()
    }
}

/// Timer that can be restarted.
///
/// `reset` discards all prior history; there is no pause or accumulation.
///
/// ```
/// use std::time::Duration;
/// use utilkit_timing::{ManualClock, Milliseconds, ResettableTimer};
///
/// let clock = ManualClock::new();
/// let mut timer = ResettableTimer::<_, Milliseconds>::with_clock(clock.clone());
/// clock.advance(Duration::from_millis(30));
/// timer.reset();
/// clock.advance(Duration::from_millis(5));
/// assert_eq!(timer.elapsed().count(), 5);
/// ```
pub struct ResettableTimer<C: Clock = MonotonicClock, U: DurationUnit = Milliseconds> {
    epoch: Epoch<C>,
    _unit: PhantomData<U>,
}

impl<C: Clock + Default, U: DurationUnit> ResettableTimer<C, U> {
    /// Start measuring now.
    pub fn new() -> Self {
        Self::with_clock(C::default())
    }
}

impl<C: Clock, U: DurationUnit> ResettableTimer<C, U> {
    /// Start measuring now, on `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            epoch: Epoch::begin(clock),
            _unit: PhantomData,
        }
    }

    /// Measure from now on.
    pub fn reset(&mut self) {
        self.epoch.restart();
    }

    elapsed_accessors!();
}

impl<C: Clock + Default, U: DurationUnit> Default for ResettableTimer<C, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + fmt::Debug, U: DurationUnit> fmt::Debug for ResettableTimer<C, U>
where
    C::Instant: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResettableTimer")
            .field("epoch", &self.epoch)
            .field("unit", &U::SUFFIX)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualClock, Seconds};

    #[test]
    fn immutable_timer_reports_in_its_unit() {
        let clock = ManualClock::new();
        let timer = ImmutableTimer::<_, Milliseconds>::with_clock(clock.clone());
        clock.advance(Duration::from_micros(2_500));

        assert_eq!(timer.elapsed().count(), 2);
        assert_eq!(timer.elapsed_us(), 2_500);
        assert_eq!(timer.elapsed_ns(), 2_500_000);
        assert_eq!(timer.elapsed_as::<Seconds>().count(), 0);
        assert_eq!(timer.elapsed_duration(), Duration::from_micros(2_500));
    }

    #[test]
    fn immutable_timer_start_is_fixed() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(1));
        let timer = ImmutableTimer::<_, Seconds>::with_clock(clock.clone());
        clock.advance(Duration::from_secs(3));

        assert_eq!(timer.started_at(), Duration::from_secs(1));
        assert_eq!(timer.elapsed().count(), 3);
        assert_eq!(timer.elapsed().count(), 3);
    }

    #[test]
    fn clock_going_backwards_reads_zero() {
        let clock = ManualClock::new();
        clock.set(Duration::from_secs(10));
        let timer = ImmutableTimer::<_, Milliseconds>::with_clock(clock.clone());
        clock.set(Duration::from_secs(2));
        assert_eq!(timer.elapsed_ms(), 0);
    }

    #[test]
    fn reset_discards_history() {
        let clock = ManualClock::new();
        let mut timer = ResettableTimer::<_, Milliseconds>::with_clock(clock.clone());
        clock.advance(Duration::from_millis(80));
        assert_eq!(timer.elapsed_ms(), 80);

        timer.reset();
        assert_eq!(timer.elapsed_ms(), 0);
        assert_eq!(timer.started_at(), Duration::from_millis(80));

        clock.advance(Duration::from_millis(7));
        timer.reset();
        timer.reset();
        clock.advance(Duration::from_millis(1));
        assert_eq!(timer.elapsed_ms(), 1);
    }

    #[test]
    fn default_constructs_with_monotonic_clock() {
        let timer: ImmutableTimer = ImmutableTimer::default();
        assert!(timer.elapsed_duration() < Duration::from_secs(60));
        let timer: ResettableTimer = ResettableTimer::default();
        assert!(timer.elapsed_ms() >= 0);
    }
}
