//! Shared memory subcommands.

use clap::Subcommand;

/// Shared memory commands. Names are passed to the OS as given.
#[derive(Subcommand)]
pub enum ShmCommand {
    /// Create a segment and leave it in place for other processes
    Create {
        /// Segment name (POSIX names start with '/')
        name: String,
        /// Segment size in bytes
        #[arg(short, long)]
        size: usize,
        /// Open the segment instead of failing if it already exists
        #[arg(long)]
        open_existing: bool,
    },
    /// Write text into an existing segment
    Write {
        name: String,
        /// Size of the view to map, in bytes
        #[arg(short, long)]
        size: usize,
        /// Byte offset to write at
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Text to write (UTF-8 bytes, no terminator added)
        data: String,
    },
    /// Print the contents of an existing segment
    Read {
        name: String,
        /// Size of the view to map, in bytes
        #[arg(short, long)]
        size: usize,
        /// Byte offset to start reading at
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Bytes to read (defaults to the rest of the view, stopping at the first NUL)
        #[arg(long)]
        len: Option<usize>,
    },
    /// Delete a segment's name
    Remove { name: String },
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::{Cli, Commands};

    #[test]
    fn test_parse_write() {
        let cli = Cli::parse_from([
            "utilkit", "shm", "write", "/seg", "--size", "64", "--offset", "8", "hello",
        ]);
        let Some(Commands::Shm {
            command: ShmCommand::Write { name, size, offset, data },
        }) = cli.command
        else {
            panic!("expected shm write");
        };
        assert_eq!((name.as_str(), size, offset, data.as_str()), ("/seg", 64, 8, "hello"));
    }

    #[test]
    fn test_create_requires_size() {
        assert!(Cli::try_parse_from(["utilkit", "shm", "create", "/seg"]).is_err());
    }
}
