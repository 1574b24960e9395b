//! Error types for timing configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`LineFormat`](crate::LineFormat).
#[derive(Debug, Error)]
pub enum FormatConfigError {
    /// Fractional digits outside the supported range.
    #[error("Precision must be between 0 and {max}, got {precision}")]
    PrecisionOutOfRange { precision: u8, max: u8 },

    /// The configuration document is not valid JSON for a line format.
    #[error("Invalid format configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("Failed to read format configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
