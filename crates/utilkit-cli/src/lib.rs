//! Command-line front end for the utilkit libraries.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings on targets without the tests that use them
#[cfg(test)]
use tempfile as _;

// Used by main.rs only
use anyhow as _;
use tracing_subscriber as _;

pub mod commands;
pub mod error;
pub mod handlers;
pub mod lib_commands;
pub mod parser;
pub mod shm_commands;

// Re-export primary types for convenient access
pub use commands::{Commands, TimeArgs, TimeUnit};
pub use error::CliError;
pub use lib_commands::LibCommand;
pub use parser::Cli;
pub use shm_commands::ShmCommand;
