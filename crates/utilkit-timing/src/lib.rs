//! Capability-checked generic timers.
//!
//! Every timer is generic over a [`Clock`], reports in a [`DurationUnit`]
//! fixed by its type, and (for [`ScopePrintTimer`]) writes to an
//! [`OutputSink`]. The contracts are enforced by trait bounds, and the
//! [`is_clock!`], [`is_duration_unit!`] and [`is_output_sink!`] predicates
//! expose them as compile-time booleans.
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for crates only used by integration tests
#[cfg(test)]
use mockall as _;

mod clock;
mod error;
mod format;
mod framerate;
pub mod predicates;
mod scope;
mod sink;
mod stats;
mod timer;
mod unit;

pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock, UtcClock};
pub use error::FormatConfigError;
pub use format::{FormatPolicy, LabelPlacement, LineFormat, MAX_PRECISION, PrefixFormat};
pub use framerate::FramerateTimer;
pub use scope::ScopePrintTimer;
pub use sink::{OutputSink, TracingSink};
pub use stats::StatsTimer;
pub use timer::{ImmutableTimer, ResettableTimer};
pub use unit::{
    DurationUnit, Hours, Microseconds, Milliseconds, Minutes, Nanoseconds, Seconds, Span,
};
