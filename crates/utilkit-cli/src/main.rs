//! CLI entry point.
//!
//! Installs the tracing subscriber, parses arguments and dispatches to the
//! handlers. Handler errors become sysexits-style exit codes.

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use utilkit_cli::{Cli, CliError, Commands, LibCommand, ShmCommand, handlers};

fn init_logging(verbose: bool) {
    // --verbose wins over RUST_LOG; otherwise RUST_LOG, defaulting to warnings.
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn dispatch(command: Commands) -> Result<i32, CliError> {
    let mut out = io::stdout().lock();
    match command {
        Commands::Shm { command } => match command {
            ShmCommand::Create {
                name,
                size,
                open_existing,
            } => handlers::shm::create(&mut out, &name, size, open_existing)?,
            ShmCommand::Write {
                name,
                size,
                offset,
                data,
            } => handlers::shm::write(&mut out, &name, size, offset, &data)?,
            ShmCommand::Read {
                name,
                size,
                offset,
                len,
            } => handlers::shm::read(&mut out, &name, size, offset, len)?,
            ShmCommand::Remove { name } => handlers::shm::remove(&mut out, &name)?,
        },
        Commands::Lib { command } => match command {
            LibCommand::Resolve { path, symbols } => {
                handlers::library::resolve(&mut out, &path, &symbols)?;
            }
        },
        Commands::Time(args) => return handlers::time::execute(&args),
    }
    Ok(0)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match dispatch(command) {
        Ok(code) => Ok(ExitCode::from(u8::try_from(code).unwrap_or(1))),
        Err(e) => {
            eprintln!("Error: {e}");
            let code = u8::try_from(e.exit_code()).unwrap_or(1);
            Ok(ExitCode::from(code))
        }
    }
}
