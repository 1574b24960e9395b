//! Duration unit capability and the typed span it produces.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

mod sealed {
    pub trait Sealed {}
}

/// One of the six fixed reporting granularities.
///
/// The set is closed: the trait is sealed so that "is a duration unit" means
/// exactly hours, minutes, seconds, milliseconds, microseconds or nanoseconds.
pub trait DurationUnit:
    sealed::Sealed + Copy + Default + fmt::Debug + Eq + Ord + Hash + Send + Sync + 'static
{
    /// Nanoseconds in one unit.
    const NANOS: u128;
    /// Short suffix used when printing a count, e.g. `ms`.
    const SUFFIX: &'static str;
}

macro_rules! duration_units {
    ($($(#[$meta:meta])* $name:ident => $nanos:expr, $suffix:literal;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub struct $name;

            impl sealed::Sealed for $name {}

            impl DurationUnit for $name {
                const NANOS: u128 = $nanos;
                const SUFFIX: &'static str = $suffix;
            }
        )*
    };
}

duration_units! {
    /// Whole hours.
    Hours => 3_600 * NANOS_PER_SEC, "h";
    /// Whole minutes.
    Minutes => 60 * NANOS_PER_SEC, "min";
    /// Whole seconds.
    Seconds => NANOS_PER_SEC, "s";
    /// Whole milliseconds.
    Milliseconds => 1_000_000, "ms";
    /// Whole microseconds.
    Microseconds => 1_000, "us";
    /// Nanoseconds.
    Nanoseconds => 1, "ns";
}

/// Elapsed time counted in unit `U`.
///
/// Conversions truncate toward zero, the same way a duration cast drops the
/// remainder. Moving to another unit is always explicit via [`Span::convert`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span<U: DurationUnit> {
    count: i64,
    _unit: PhantomData<U>,
}

impl<U: DurationUnit> Span<U> {
    /// Span of exactly `count` units.
    pub const fn new(count: i64) -> Self {
        Self {
            count,
            _unit: PhantomData,
        }
    }

    /// Whole units contained in `duration`, saturating at `i64::MAX`.
    pub fn from_duration(duration: Duration) -> Self {
        let count = duration.as_nanos() / U::NANOS;
        Self::new(i64::try_from(count).unwrap_or(i64::MAX))
    }

    /// Raw count of units.
    pub const fn count(self) -> i64 {
        self.count
    }

    /// The span as a [`Duration`]. Negative spans read as zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_duration(self) -> Duration {
        if self.count <= 0 {
            return Duration::ZERO;
        }
        let nanos = self.count as u128 * U::NANOS;
        let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
        Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
    }

    /// Re-express the span in unit `V`, truncating toward zero.
    #[allow(clippy::cast_possible_wrap)]
    pub fn convert<V: DurationUnit>(self) -> Span<V> {
        let nanos = i128::from(self.count) * U::NANOS as i128;
        let count = nanos / V::NANOS as i128;
        let count = i64::try_from(count).unwrap_or(if count < 0 { i64::MIN } else { i64::MAX });
        Span::new(count)
    }
}

impl<U: DurationUnit> fmt::Display for Span<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, U::SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_duration_truncates() {
        let d = Duration::from_micros(2_999);
        assert_eq!(Span::<Milliseconds>::from_duration(d).count(), 2);
        assert_eq!(Span::<Microseconds>::from_duration(d).count(), 2_999);
        assert_eq!(Span::<Seconds>::from_duration(d).count(), 0);
    }

    #[test]
    fn from_duration_saturates() {
        assert_eq!(Span::<Nanoseconds>::from_duration(Duration::MAX).count(), i64::MAX);
    }

    #[test]
    fn convert_is_explicit_and_truncating() {
        let span = Span::<Seconds>::new(125);
        assert_eq!(span.convert::<Minutes>().count(), 2);
        assert_eq!(span.convert::<Milliseconds>().count(), 125_000);
        assert_eq!(Span::<Minutes>::new(-3).convert::<Hours>().count(), 0);
    }

    #[test]
    fn as_duration_round_trips_whole_units() {
        assert_eq!(Span::<Hours>::new(2).as_duration(), Duration::from_secs(7_200));
        assert_eq!(
            Span::<Nanoseconds>::new(1_500_000_001).as_duration(),
            Duration::new(1, 500_000_001)
        );
        assert_eq!(Span::<Seconds>::new(-1).as_duration(), Duration::ZERO);
    }

    #[test]
    fn display_uses_unit_suffix() {
        assert_eq!(Span::<Milliseconds>::new(42).to_string(), "42ms");
        assert_eq!(Span::<Minutes>::new(7).to_string(), "7min");
        assert_eq!(Span::<Microseconds>::new(3).to_string(), "3us");
    }

    #[test]
    fn spans_order_by_count() {
        assert!(Span::<Seconds>::new(1) < Span::<Seconds>::new(2));
    }
}
