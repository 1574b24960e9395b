//! Record formatting for scope timers.
//!
//! A [`FormatPolicy`] decides how a label and an elapsed duration become one
//! line of output. Rendering is a pure function of the policy's configuration,
//! the unit and the duration, so a fixed configuration always produces the
//! same text for the same measurement.

use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FormatConfigError;
use crate::unit::{DurationUnit, Span};

/// Largest supported number of fractional digits (nanosecond resolution).
pub const MAX_PRECISION: u8 = 9;

/// Turns a measurement into a newline-terminated record.
pub trait FormatPolicy {
    fn render<U: DurationUnit>(&self, label: Option<&str>, elapsed: Duration) -> String;
}

/// Label immediately followed by the whole-unit count, e.g. `load: 12\n`.
///
/// The label is printed verbatim, so callers include their own separator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefixFormat;

impl FormatPolicy for PrefixFormat {
    fn render<U: DurationUnit>(&self, label: Option<&str>, elapsed: Duration) -> String {
        format!(
            "{}{}\n",
            label.unwrap_or_default(),
            Span::<U>::from_duration(elapsed).count()
        )
    }
}

/// Where the label goes relative to the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPlacement {
    #[default]
    Before,
    After,
}

/// Configurable record layout.
///
/// All fields are optional in serialized form and fall back to the defaults:
///
/// ```
/// use utilkit_timing::{LineFormat, FormatPolicy, Milliseconds};
/// use std::time::Duration;
///
/// let format = LineFormat::from_json(r#"{ "precision": 2 }"#).unwrap();
/// let line = format.render::<Milliseconds>(Some("parse"), Duration::from_micros(1_250));
/// assert_eq!(line, "parse: 1.25ms\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineFormat {
    /// Text between label and value.
    pub separator: String,

    /// Append the unit suffix (`ms`, `us`, ...) to the value.
    pub show_unit: bool,

    /// Fractional digits of the unit to print (0 prints whole units).
    pub precision: u8,

    /// Label before or after the value.
    pub label_placement: LabelPlacement,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            separator: ": ".to_string(),
            show_unit: true,
            precision: 0,
            label_placement: LabelPlacement::Before,
        }
    }
}

impl LineFormat {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, FormatConfigError> {
        let format: Self = serde_json::from_str(json)?;
        format.validate()?;
        Ok(format)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self, FormatConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| FormatConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub const fn validate(&self) -> Result<(), FormatConfigError> {
        if self.precision > MAX_PRECISION {
            return Err(FormatConfigError::PrecisionOutOfRange {
                precision: self.precision,
                max: MAX_PRECISION,
            });
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn value<U: DurationUnit>(&self, elapsed: Duration) -> String {
        let mut value = if self.precision == 0 {
            Span::<U>::from_duration(elapsed).count().to_string()
        } else {
            let units = elapsed.as_nanos() as f64 / U::NANOS as f64;
            format!("{units:.prec$}", prec = usize::from(self.precision))
        };
        if self.show_unit {
            value.push_str(U::SUFFIX);
        }
        value
    }
}

impl FormatPolicy for LineFormat {
    fn render<U: DurationUnit>(&self, label: Option<&str>, elapsed: Duration) -> String {
        let value = self.value::<U>(elapsed);
        let mut line = String::with_capacity(value.len() + 32);
        // Writing into a String cannot fail.
        let _ = match (label, self.label_placement) {
            (Some(label), LabelPlacement::Before) => {
                write!(line, "{label}{}{value}", self.separator)
            }
            (Some(label), LabelPlacement::After) => {
                write!(line, "{value}{}{label}", self.separator)
            }
            (None, _) => write!(line, "{value}"),
        };
        line.push('\n');
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Microseconds, Milliseconds, Seconds};

    #[test]
    fn prefix_format_matches_prefix_then_count() {
        let line =
            PrefixFormat.render::<Milliseconds>(Some("frame took "), Duration::from_micros(16_900));
        assert_eq!(line, "frame took 16\n");
    }

    #[test]
    fn prefix_format_without_label() {
        let line = PrefixFormat.render::<Microseconds>(None, Duration::from_nanos(7_400));
        assert_eq!(line, "7\n");
    }

    #[test]
    fn line_format_defaults() {
        let line =
            LineFormat::default().render::<Seconds>(Some("sync"), Duration::from_millis(3_700));
        assert_eq!(line, "sync: 3s\n");
    }

    #[test]
    fn line_format_label_after_without_unit() {
        let format = LineFormat {
            separator: " <- ".to_string(),
            show_unit: false,
            label_placement: LabelPlacement::After,
            ..LineFormat::default()
        };
        let line = format.render::<Milliseconds>(Some("query"), Duration::from_millis(42));
        assert_eq!(line, "42 <- query\n");
    }

    #[test]
    fn line_format_is_deterministic() {
        let format = LineFormat::from_json(r#"{"precision": 3}"#).unwrap();
        let elapsed = Duration::from_nanos(1_234_567);
        let first = format.render::<Milliseconds>(None, elapsed);
        let second = format.render::<Milliseconds>(None, elapsed);
        assert_eq!(first, "1.235ms\n");
        assert_eq!(first, second);
    }

    #[test]
    fn from_json_rejects_excess_precision() {
        let err = LineFormat::from_json(r#"{"precision": 12}"#).unwrap_err();
        assert!(matches!(
            err,
            FormatConfigError::PrecisionOutOfRange { precision: 12, max: 9 }
        ));
    }

    #[test]
    fn from_json_rejects_unknown_placement() {
        let err = LineFormat::from_json(r#"{"label_placement": "middle"}"#).unwrap_err();
        assert!(matches!(err, FormatConfigError::Parse(_)));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("format.json");
        std::fs::write(&path, r#"{"separator": " = ", "show_unit": false}"#).unwrap();

        let format = LineFormat::from_path(&path).unwrap();
        assert_eq!(format.separator, " = ");
        assert!(!format.show_unit);
        assert_eq!(format.label_placement, LabelPlacement::Before);
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LineFormat::from_path(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, FormatConfigError::Read { .. }));
    }
}
