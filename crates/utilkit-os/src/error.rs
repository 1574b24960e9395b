//! Error types for OS resource wrappers.
//!
//! Acquisition failures (create, open, map, load, resolve) are returned as
//! [`OsError`]. Release failures on drop never surface here; they are logged.

use std::io;

use thiserror::Error;

/// Errors produced while acquiring or operating on an OS resource.
#[derive(Debug, Error)]
pub enum OsError {
    // === Identity ===
    /// No resource exists under the given name or path.
    #[error("'{name}' was not found")]
    NotFound { name: String },

    /// A resource already exists under the given name.
    #[error("'{name}' already exists")]
    AlreadyExists { name: String },

    /// The OS refused access to the resource.
    #[error("Permission denied for '{name}': {source}")]
    PermissionDenied {
        name: String,
        #[source]
        source: io::Error,
    },

    /// A process- or system-wide limit was hit (descriptors, memory, space).
    #[error("Resource limit exceeded for '{name}': {source}")]
    ResourceLimitExceeded {
        name: String,
        #[source]
        source: io::Error,
    },

    // === Shared memory ===
    /// The segment could not be mapped into the address space.
    #[error("Failed to map '{name}' ({size} bytes): {source}")]
    MappingFailed {
        name: String,
        size: usize,
        #[source]
        source: io::Error,
    },

    /// An existing segment is smaller than the size asked for.
    #[error("Segment '{name}' holds {actual} bytes, fewer than the requested {expected}")]
    SizeMismatch {
        name: String,
        expected: usize,
        actual: u64,
    },

    // === Dynamic libraries ===
    /// The file exists but could not be loaded as a library.
    #[error("Failed to load library '{path}': {message}")]
    LoadError { path: String, message: String },

    /// The library does not export the symbol.
    #[error("Symbol '{symbol}' not found in '{path}'")]
    SymbolNotFound { symbol: String, path: String },

    // === Handles ===
    /// The wrapper no longer owns a resource.
    #[error("Operation on an empty handle")]
    InvalidHandle,

    // === Other ===
    /// A caller-supplied argument was rejected before reaching the OS.
    #[error("Invalid argument for '{name}': {reason}")]
    InvalidArgument { name: String, reason: &'static str },

    /// Any other OS failure.
    #[error("{op} failed for '{name}': {source}")]
    Io {
        op: &'static str,
        name: String,
        #[source]
        source: io::Error,
    },
}

impl OsError {
    /// Sort an OS error into the taxonomy, keeping the operation for context.
    pub(crate) fn from_io(op: &'static str, name: &str, err: io::Error) -> Self {
        let name = name.to_string();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { name },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { name },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { name, source: err },
            io::ErrorKind::OutOfMemory => Self::ResourceLimitExceeded { name, source: err },
            _ if is_resource_limit(&err) => Self::ResourceLimitExceeded { name, source: err },
            _ => Self::Io {
                op,
                name,
                source: err,
            },
        }
    }
}

#[cfg(unix)]
fn is_resource_limit(err: &io::Error) -> bool {
    use nix::libc;

    matches!(
        err.raw_os_error(),
        Some(libc::EMFILE | libc::ENFILE | libc::ENOMEM | libc::ENOSPC)
    )
}

#[cfg(windows)]
fn is_resource_limit(err: &io::Error) -> bool {
    use windows::Win32::Foundation::{
        ERROR_COMMITMENT_LIMIT, ERROR_DISK_FULL, ERROR_NO_SYSTEM_RESOURCES,
        ERROR_NOT_ENOUGH_MEMORY, ERROR_OUTOFMEMORY, ERROR_TOO_MANY_OPEN_FILES,
    };

    let Some(code) = err.raw_os_error() else {
        return false;
    };
    [
        ERROR_COMMITMENT_LIMIT,
        ERROR_DISK_FULL,
        ERROR_NO_SYSTEM_RESOURCES,
        ERROR_NOT_ENOUGH_MEMORY,
        ERROR_OUTOFMEMORY,
        ERROR_TOO_MANY_OPEN_FILES,
    ]
    .iter()
    .any(|known| i32::try_from(known.0).is_ok_and(|known| known == code))
}

/// Result type for OS resource operations.
pub type Result<T> = std::result::Result<T, OsError>;
