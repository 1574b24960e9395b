//! Dynamic library subcommands.

use clap::Subcommand;

/// Dynamic library commands.
#[derive(Subcommand)]
pub enum LibCommand {
    /// Load a library and print the address of each symbol
    Resolve {
        /// Library file name or path (searched with the platform loader's rules)
        path: String,
        /// Exported symbol names
        #[arg(required = true, num_args = 1..)]
        symbols: Vec<String>,
    },
}
