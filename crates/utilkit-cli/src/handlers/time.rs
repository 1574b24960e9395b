//! Time command handler.
//!
//! Runs a child process inside a [`ScopePrintTimer`], so the duration is
//! reported even when the child cannot be spawned.

use std::process::Command;

use tracing::debug;
use utilkit_timing::{
    DurationUnit, Hours, LineFormat, Microseconds, Milliseconds, Minutes, MonotonicClock,
    Nanoseconds, OutputSink, ScopePrintTimer, Seconds,
};

use crate::commands::{TimeArgs, TimeUnit};
use crate::error::CliError;

/// Exit code reported when the child has none (killed by a signal).
const SIGNALLED_EXIT_CODE: i32 = 128;

/// Execute `utilkit time`, reporting to stderr.
///
/// Returns the child's exit code.
pub fn execute(args: &TimeArgs) -> Result<i32, CliError> {
    execute_with_sink(args, std::io::stderr())
}

/// Execute `utilkit time`, reporting to `sink`.
pub fn execute_with_sink<S: OutputSink>(args: &TimeArgs, sink: S) -> Result<i32, CliError> {
    let format = match &args.format_config {
        Some(path) => LineFormat::from_path(path)?,
        None => LineFormat::default(),
    };
    let label = args.label.clone().or_else(|| args.command.first().cloned());

    match args.unit {
        TimeUnit::H => run::<Hours, S>(&args.command, label, format, sink),
        TimeUnit::Min => run::<Minutes, S>(&args.command, label, format, sink),
        TimeUnit::S => run::<Seconds, S>(&args.command, label, format, sink),
        TimeUnit::Ms => run::<Milliseconds, S>(&args.command, label, format, sink),
        TimeUnit::Us => run::<Microseconds, S>(&args.command, label, format, sink),
        TimeUnit::Ns => run::<Nanoseconds, S>(&args.command, label, format, sink),
    }
}

fn run<U: DurationUnit, S: OutputSink>(
    command: &[String],
    label: Option<String>,
    format: LineFormat,
    sink: S,
) -> Result<i32, CliError> {
    let (program, rest) = command
        .split_first()
        .ok_or_else(|| CliError::Arguments("no command to time".to_string()))?;

    let timer = ScopePrintTimer::<MonotonicClock, U, S, LineFormat>::with_parts(
        MonotonicClock,
        sink,
        format,
        label,
    );
    debug!(%program, args = ?rest, "Spawning timed command");
    let status = Command::new(program)
        .args(rest)
        .status()
        .map_err(|e| CliError::Io(format!("failed to run '{program}': {e}")))?;
    let span = timer.finish()?;
    debug!(%span, ?status, "Timed command finished");

    Ok(status.code().unwrap_or(SIGNALLED_EXIT_CODE))
}

#[cfg(all(test, unix))]
mod tests {
    use std::io::Write;

    use super::*;

    fn args(unit: TimeUnit, command: &[&str]) -> TimeArgs {
        TimeArgs {
            unit,
            label: None,
            format_config: None,
            command: command.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn test_reports_one_line_and_child_exit_code() {
        let mut out = Vec::new();
        let code = execute_with_sink(&args(TimeUnit::Ns, &["false"]), &mut out).unwrap();
        assert_eq!(code, 1);

        let line = String::from_utf8(out).unwrap();
        assert!(line.starts_with("false: "), "{line}");
        assert!(line.ends_with("ns\n"), "{line}");
        assert_eq!(line.lines().count(), 1);
    }

    #[test]
    fn test_format_config_is_applied() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        write!(config, r#"{{ "separator": " took ", "show_unit": false }}"#).unwrap();

        let mut time_args = args(TimeUnit::H, &["true"]);
        time_args.label = Some("noop".to_string());
        time_args.format_config = Some(config.path().to_path_buf());

        let mut out = Vec::new();
        assert_eq!(execute_with_sink(&time_args, &mut out).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "noop took 0\n");
    }

    #[test]
    fn test_spawn_failure_still_reports_timing() {
        let mut out = Vec::new();
        let missing = args(TimeUnit::Ms, &["/nonexistent/utilkit-bin"]);
        let err = execute_with_sink(&missing, &mut out).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_invalid_format_config_is_config_error() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        write!(config, r#"{{ "precision": 42 }}"#).unwrap();

        let mut time_args = args(TimeUnit::Ms, &["true"]);
        time_args.format_config = Some(config.path().to_path_buf());
        let err = execute_with_sink(&time_args, Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), 78);
    }
}
