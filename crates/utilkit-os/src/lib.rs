//! Scoped ownership of OS resources: raw handles, named shared memory and
//! dynamic libraries.
//!
//! Each wrapper releases what it owns exactly once, on drop or through an
//! explicit call. Release failures during drop are logged through `tracing`;
//! acquisition failures are returned as [`OsError`].
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for crates only used by integration tests
#[cfg(test)]
use tempfile as _;

pub mod error;
pub mod handle;
pub mod library;
pub mod shm;

pub use error::{OsError, Result};
#[cfg(unix)]
pub use handle::FileDescriptor;
#[cfg(windows)]
pub use handle::Win32Handle;
pub use handle::{AutoHandle, HandleKind, PlatformHandle};
pub use library::{SharedLibrary, SymbolAddress};
pub use shm::{OpenMode, SharedMemory};
