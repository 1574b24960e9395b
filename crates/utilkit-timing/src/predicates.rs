//! Compile-time capability predicates.
//!
//! `is_clock!(T)`, `is_duration_unit!(T)` and `is_output_sink!(T)` evaluate to
//! a `const bool` telling whether `T` satisfies the matching contract. They
//! work for any concrete type without the type opting in, and cost nothing at
//! runtime.
//!
//! The `require_*!` forms turn a failed predicate into a build error:
//!
//! ```compile_fail
//! utilkit_timing::require_clock!(u32);
//! ```
//!
//! Timers carry the same contracts as trait bounds, so a non-conforming
//! parameter is rejected before anything runs:
//!
//! ```compile_fail
//! let _timer = utilkit_timing::ImmutableTimer::<std::time::Instant>::new();
//! ```
//!
//! ```compile_fail
//! use utilkit_timing::{MonotonicClock, ResettableTimer};
//! let _timer = ResettableTimer::<MonotonicClock, std::time::Duration>::new();
//! ```
//!
//! Windowed timers need room for at least one sample, checked when the
//! window size is fixed:
//!
//! ```compile_fail
//! use utilkit_timing::{ManualClock, StatsTimer};
//! let _stats = StatsTimer::<0, _>::with_clock(ManualClock::new());
//! ```
//!
//! ```compile_fail
//! use utilkit_timing::{FramerateTimer, ManualClock};
//! let _frames = FramerateTimer::<0, _>::with_clock(ManualClock::new());
//! ```
//!
//! The same window sizes above zero build:
//!
//! ```
//! use utilkit_timing::{FramerateTimer, ManualClock, StatsTimer};
//! let _stats = StatsTimer::<1, _>::with_clock(ManualClock::new());
//! let _frames = FramerateTimer::<1, _>::with_clock(ManualClock::new());
//! ```

/// Resolves to `true` when the inherent constant applies (`$ty: $bound`) and
/// falls back to the blanket trait constant otherwise.
#[doc(hidden)]
#[macro_export]
macro_rules! __satisfies {
    ($ty:ty, $bound:path) => {{
        trait Unsatisfied {
            const SATISFIED: bool = false;
        }
        impl<T: ?Sized> Unsatisfied for T {}

        struct Probe<T: ?Sized>(::core::marker::PhantomData<T>);

        #[allow(dead_code)]
        impl<T: ?Sized + $bound> Probe<T> {
            const SATISFIED: bool = true;
        }

        <Probe<$ty>>::SATISFIED
    }};
}

/// Whether `T` implements [`Clock`](crate::Clock).
///
/// ```
/// use utilkit_timing::{MonotonicClock, is_clock};
///
/// const MONOTONIC: bool = is_clock!(MonotonicClock);
/// assert!(MONOTONIC);
/// assert!(!is_clock!(std::time::Instant));
/// ```
#[macro_export]
macro_rules! is_clock {
    ($ty:ty) => {
        $crate::__satisfies!($ty, $crate::Clock)
    };
}

/// Whether `T` is one of the six [`DurationUnit`](crate::DurationUnit)s.
///
/// ```
/// use utilkit_timing::{Microseconds, is_duration_unit};
///
/// assert!(is_duration_unit!(Microseconds));
/// assert!(!is_duration_unit!(std::time::Duration));
/// ```
#[macro_export]
macro_rules! is_duration_unit {
    ($ty:ty) => {
        $crate::__satisfies!($ty, $crate::DurationUnit)
    };
}

/// Whether `T` implements [`OutputSink`](crate::OutputSink).
///
/// ```
/// use utilkit_timing::is_output_sink;
///
/// assert!(is_output_sink!(std::io::Stderr));
/// assert!(!is_output_sink!(String));
/// ```
#[macro_export]
macro_rules! is_output_sink {
    ($ty:ty) => {
        $crate::__satisfies!($ty, $crate::OutputSink)
    };
}

/// Fails the build unless `T` is a clock.
#[macro_export]
macro_rules! require_clock {
    ($ty:ty) => {
        const _: () = ::core::assert!(
            $crate::is_clock!($ty),
            ::core::concat!("contract violation: `", ::core::stringify!($ty), "` is not a Clock")
        );
    };
}

/// Fails the build unless `T` is a duration unit.
#[macro_export]
macro_rules! require_duration_unit {
    ($ty:ty) => {
        const _: () = ::core::assert!(
            $crate::is_duration_unit!($ty),
            ::core::concat!(
                "contract violation: `",
                ::core::stringify!($ty),
                "` is not a DurationUnit"
            )
        );
    };
}

/// Fails the build unless `T` is an output sink.
#[macro_export]
macro_rules! require_output_sink {
    ($ty:ty) => {
        const _: () = ::core::assert!(
            $crate::is_output_sink!($ty),
            ::core::concat!(
                "contract violation: `",
                ::core::stringify!($ty),
                "` is not an OutputSink"
            )
        );
    };
}
