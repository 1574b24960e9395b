//! Output sink capability.

use std::io;

/// Destination for formatted timing records.
///
/// Every [`io::Write`] is a sink: the record is written in full and the
/// writer flushed, so a line reaches a console or file as soon as it is
/// emitted. [`TracingSink`] routes records into the `tracing` pipeline instead.
pub trait OutputSink {
    /// Write one complete record.
    fn write_record(&mut self, record: &str) -> io::Result<()>;
}

impl<W: io::Write + ?Sized> OutputSink for W {
    fn write_record(&mut self, record: &str) -> io::Result<()> {
        self.write_all(record.as_bytes())?;
        self.flush()
    }
}

/// Sink that turns each record into a `tracing` event.
///
/// Trailing newlines are dropped since the subscriber adds its own.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    level: tracing::Level,
}

impl TracingSink {
    pub const fn new(level: tracing::Level) -> Self {
        Self { level }
    }

    pub const fn level(&self) -> tracing::Level {
        self.level
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(tracing::Level::INFO)
    }
}

impl OutputSink for TracingSink {
    fn write_record(&mut self, record: &str) -> io::Result<()> {
        let record = record.trim_end_matches(['\r', '\n']);
        match self.level {
            tracing::Level::ERROR => tracing::error!(target: "utilkit::timing", "{record}"),
            tracing::Level::WARN => tracing::warn!(target: "utilkit::timing", "{record}"),
            tracing::Level::INFO => tracing::info!(target: "utilkit::timing", "{record}"),
            tracing::Level::DEBUG => tracing::debug!(target: "utilkit::timing", "{record}"),
            _ => tracing::trace!(target: "utilkit::timing", "{record}"),
        }
        Ok(())
    }
}
