//! Main commands enum.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::lib_commands::LibCommand;
use crate::shm_commands::ShmCommand;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Create, write, read or remove named shared memory segments
    Shm {
        #[command(subcommand)]
        command: ShmCommand,
    },

    /// Load dynamic libraries and resolve their symbols
    Lib {
        #[command(subcommand)]
        command: LibCommand,
    },

    /// Run a command and print how long it took (to stderr)
    Time(TimeArgs),
}

/// Arguments for `utilkit time`.
#[derive(Args, Debug)]
pub struct TimeArgs {
    /// Unit to report the duration in
    #[arg(short, long, value_enum, default_value_t = TimeUnit::Ms)]
    pub unit: TimeUnit,

    /// Label printed next to the duration (defaults to the program name)
    #[arg(short, long)]
    pub label: Option<String>,

    /// JSON file describing the output line (separator, precision, ...)
    #[arg(long = "format-config", env = "UTILKIT_FORMAT_CONFIG")]
    pub format_config: Option<PathBuf>,

    /// Program and arguments to run
    #[arg(last = true, required = true, num_args = 1..)]
    pub command: Vec<String>,
}

/// Reporting units accepted by `--unit`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    H,
    Min,
    S,
    Ms,
    Us,
    Ns,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::Cli;

    #[test]
    fn test_time_takes_trailing_command() {
        let cli = Cli::parse_from(["utilkit", "time", "--unit", "us", "--", "sleep", "0.1"]);
        let Some(Commands::Time(args)) = cli.command else {
            panic!("expected time command");
        };
        assert_eq!(args.unit, TimeUnit::Us);
        assert_eq!(args.command, vec!["sleep", "0.1"]);
        assert!(args.label.is_none());
    }

    #[test]
    fn test_time_requires_a_command() {
        assert!(Cli::try_parse_from(["utilkit", "time"]).is_err());
    }

    #[test]
    fn test_time_unit_defaults_to_milliseconds() {
        let cli = Cli::parse_from(["utilkit", "time", "--label", "build", "--", "true"]);
        let Some(Commands::Time(args)) = cli.command else {
            panic!("expected time command");
        };
        assert_eq!(args.unit, TimeUnit::Ms);
        assert_eq!(args.label.as_deref(), Some("build"));
    }
}
