//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the utilkit timers and OS resource wrappers.
#[derive(Parser)]
#[command(name = "utilkit")]
#[command(about = "Time commands and poke at shared memory and dynamic libraries")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_verbose_after_subcommand() {
        let cli = Cli::parse_from(["utilkit", "shm", "remove", "/seg", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::parse_from(["utilkit"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }
}
