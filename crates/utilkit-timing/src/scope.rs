//! Scope-bound timer that reports on drop.

use std::io;
use std::marker::PhantomData;
use std::time::Duration;

use tracing::warn;

use crate::clock::{Clock, MonotonicClock};
use crate::format::{FormatPolicy, PrefixFormat};
use crate::sink::OutputSink;
use crate::timer::Epoch;
use crate::unit::{DurationUnit, Milliseconds, Span};

/// Measures the lifetime of the enclosing scope and writes one record when it
/// ends.
///
/// The record is written exactly once: on drop (normal exit, early return,
/// `?` propagation or unwinding), or earlier through [`finish`](Self::finish),
/// after which the drop is silent. A sink failure during drop is logged and
/// swallowed.
///
/// ```
/// use utilkit_timing::{Milliseconds, MonotonicClock, ScopePrintTimer};
///
/// let mut out = Vec::new();
/// {
///     let _timer =
///         ScopePrintTimer::<MonotonicClock, Milliseconds, _>::with_sink("load: ", &mut out);
/// }
/// assert!(String::from_utf8(out).unwrap().starts_with("load: "));
/// ```
pub struct ScopePrintTimer<
    C: Clock = MonotonicClock,
    U: DurationUnit = Milliseconds,
    S: OutputSink = io::Stdout,
    F: FormatPolicy = PrefixFormat,
> {
    epoch: Epoch<C>,
    label: Option<String>,
    sink: S,
    format: F,
    armed: bool,
    _unit: PhantomData<U>,
}

impl<C: Clock + Default, U: DurationUnit> ScopePrintTimer<C, U, io::Stdout, PrefixFormat> {
    /// Report to stdout as `label` followed by the count.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_parts(C::default(), io::stdout(), PrefixFormat, Some(label.into()))
    }
}

impl<C: Clock + Default, U: DurationUnit, S: OutputSink> ScopePrintTimer<C, U, S, PrefixFormat> {
    /// Report to `sink` as `label` followed by the count.
    pub fn with_sink(label: impl Into<String>, sink: S) -> Self {
        Self::with_parts(C::default(), sink, PrefixFormat, Some(label.into()))
    }
}

impl<C: Clock, U: DurationUnit, S: OutputSink, F: FormatPolicy> ScopePrintTimer<C, U, S, F> {
    /// Fully specified constructor. Measurement starts here.
    pub fn with_parts(clock: C, sink: S, format: F, label: Option<String>) -> Self {
        Self {
            epoch: Epoch::begin(clock),
            label,
            sink,
            format,
            armed: true,
            _unit: PhantomData,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Time so far, without reporting.
    pub fn elapsed(&self) -> Span<U> {
        Span::from_duration(self.epoch.elapsed())
    }

    /// Report now and return the measured span.
    ///
    /// Unlike the drop path, a sink failure is returned to the caller.
    pub fn finish(mut self) -> io::Result<Span<U>> {
        let elapsed = self.epoch.elapsed();
        self.armed = false;
        self.emit(elapsed)?;
        Ok(Span::from_duration(elapsed))
    }

    fn emit(&mut self, elapsed: Duration) -> io::Result<()> {
        let record = self.format.render::<U>(self.label.as_deref(), elapsed);
        self.sink.write_record(&record)
    }
}

impl<C: Clock, U: DurationUnit, S: OutputSink, F: FormatPolicy> Drop
    for ScopePrintTimer<C, U, S, F>
{
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        let elapsed = self.epoch.elapsed();
        if let Err(e) = self.emit(elapsed) {
            warn!(
                label = self.label.as_deref().unwrap_or_default(),
                "Failed to write scope timing: {e}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LineFormat, ManualClock, Microseconds};

    fn output(buf: &[u8]) -> String {
        String::from_utf8(buf.to_vec()).unwrap()
    }

    #[test]
    fn writes_one_record_at_scope_exit() {
        let clock = ManualClock::new();
        let mut out = Vec::new();
        {
            let _timer = ScopePrintTimer::<_, Microseconds, _>::with_parts(
                clock.clone(),
                &mut out,
                PrefixFormat,
                Some("decode ".to_string()),
            );
            clock.advance(Duration::from_micros(340));
        }
        assert_eq!(output(&out), "decode 340\n");
    }

    #[test]
    fn early_return_still_reports_once() {
        fn parse(
            clock: &ManualClock,
            out: &mut Vec<u8>,
            input: &str,
        ) -> Result<u32, std::num::ParseIntError> {
            let _timer = ScopePrintTimer::<_, Milliseconds, _, _>::with_parts(
                clock.clone(),
                out,
                LineFormat::default(),
                Some("parse".to_string()),
            );
            clock.advance(Duration::from_millis(4));
            let value = input.parse::<u32>()?;
            clock.advance(Duration::from_millis(100));
            Ok(value)
        }

        let clock = ManualClock::new();
        let mut out = Vec::new();
        assert!(parse(&clock, &mut out, "not a number").is_err());
        assert_eq!(output(&out), "parse: 4ms\n");
    }

    #[test]
    fn finish_reports_once_and_disarms_drop() {
        let clock = ManualClock::new();
        let mut out = Vec::new();
        let timer = ScopePrintTimer::<_, Milliseconds, _>::with_parts(
            clock.clone(),
            &mut out,
            PrefixFormat,
            None,
        );
        clock.advance(Duration::from_millis(12));
        assert_eq!(timer.elapsed().count(), 12);

        let span = timer.finish().unwrap();
        assert_eq!(span.count(), 12);
        assert_eq!(output(&out), "12\n");
    }

    #[test]
    fn label_accessor() {
        let timer = ScopePrintTimer::<MonotonicClock, Milliseconds, _>::with_sink("x", io::sink());
        assert_eq!(timer.label(), Some("x"));
    }
}
