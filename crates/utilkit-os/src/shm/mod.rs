//! Named shared-memory segments.
//!
//! A [`SharedMemory`] owns one process's view of a named segment: the OS
//! handle for the segment and, while mapped, the mapping itself. Dropping it
//! unmaps and closes but never deletes the name, because other processes may
//! still be using the segment. Deleting the name is an explicit
//! [`SharedMemory::remove`].
//!
//! Nothing here coordinates readers and writers of the bytes inside a
//! segment; callers bring their own protocol.

#[cfg(unix)]
mod unix;
#[cfg(unix)]
use unix as sys;

#[cfg(windows)]
mod win32;
#[cfg(windows)]
use win32 as sys;

use std::fmt;
use std::ptr::NonNull;

use tracing::{debug, warn};

use crate::error::{OsError, Result};
use crate::handle::{AutoHandle, PlatformHandle};

/// How [`SharedMemory::create_or_open`] treats an existing segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenMode {
    /// Create the segment; fail with `AlreadyExists` if the name is taken.
    CreateNew,
    /// Open the segment; fail with `NotFound` if it does not exist.
    OpenExisting,
    /// Open the segment if it exists, otherwise create it.
    OpenOrCreate,
}

/// One process's handle on a named shared-memory segment.
///
/// The wrapper is `Send` but not `Sync`: it can move to another thread or
/// sit behind a `Mutex`, and callers serialize access to one instance.
pub struct SharedMemory {
    name: String,
    size: usize,
    mode: OpenMode,
    created: bool,
    handle: AutoHandle<PlatformHandle>,
    view: Option<NonNull<u8>>,
}

// SAFETY: the mapping and the OS handle are valid process-wide and owned by
// this wrapper alone; nothing is tied to the thread that created them.
#[allow(unsafe_code)]
unsafe impl Send for SharedMemory {}

impl SharedMemory {
    /// Open or create the segment `name` with room for `size` bytes.
    ///
    /// `name` is handed to the OS unmodified (POSIX expects a leading `/`).
    /// A newly created segment is zero-filled. An existing segment must be at
    /// least `size` bytes. If a segment created here cannot be sized, it is
    /// removed again before the error is returned.
    ///
    /// The segment is not mapped yet; call [`map`](Self::map).
    pub fn create_or_open(name: &str, size: usize, mode: OpenMode) -> Result<Self> {
        if size == 0 {
            return Err(OsError::InvalidArgument {
                name: name.to_string(),
                reason: "segment size must be non-zero",
            });
        }

        let (handle, created) = sys::open(name, size, mode)?;
        debug!(name, size, ?mode, created, "Opened shared memory segment");

        Ok(Self {
            name: name.to_string(),
            size,
            mode,
            created,
            handle,
            view: None,
        })
    }

    /// Map the segment and return the start of the view.
    ///
    /// Mapping an already mapped segment returns the existing view.
    pub fn map(&mut self) -> Result<NonNull<u8>> {
        if let Some(view) = self.view {
            return Ok(view);
        }
        let view = sys::map(&self.handle, self.size).map_err(|source| OsError::MappingFailed {
            name: self.name.clone(),
            size: self.size,
            source,
        })?;
        debug!(name = %self.name, size = self.size, "Mapped shared memory segment");
        self.view = Some(view);
        Ok(view)
    }

    /// Drop the mapping. Does nothing if the segment is not mapped.
    ///
    /// The view is forgotten even if the OS reports a failure.
    pub fn unmap(&mut self) -> Result<()> {
        let Some(view) = self.view.take() else {
            return Ok(());
        };
        debug!(name = %self.name, "Unmapping shared memory segment");
        sys::unmap(view, self.size).map_err(|source| OsError::Io {
            op: "unmap",
            name: self.name.clone(),
            source,
        })
    }

    /// Delete the name `name` from the system.
    ///
    /// Processes that already opened the segment keep their views. On Windows
    /// a named mapping disappears with its last handle, so this is a no-op.
    pub fn remove(name: &str) -> Result<()> {
        debug!(name, "Removing shared memory segment");
        sys::remove(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bytes requested at open time (the mapped length).
    pub const fn size(&self) -> usize {
        self.size
    }

    pub const fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Whether this call created the segment rather than opening it.
    pub const fn created(&self) -> bool {
        self.created
    }

    pub const fn is_mapped(&self) -> bool {
        self.view.is_some()
    }

    /// The mapped view, or `None` while unmapped.
    ///
    /// Other processes may write the segment at any time; the slice reflects
    /// whatever bytes are present when it is read.
    #[allow(unsafe_code)]
    pub fn as_slice(&self) -> Option<&[u8]> {
        // SAFETY: `view` points at `size` mapped bytes that stay mapped for as
        // long as `self` is borrowed, since unmapping needs `&mut self`.
        self.view
            .map(|view| unsafe { std::slice::from_raw_parts(view.as_ptr(), self.size) })
    }

    /// The mapped view as a mutable slice, or `None` while unmapped.
    #[allow(unsafe_code)]
    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        // SAFETY: as for `as_slice`; the exclusive borrow of `self` rules out
        // aliasing slices from this wrapper.
        self.view
            .map(|view| unsafe { std::slice::from_raw_parts_mut(view.as_ptr(), self.size) })
    }
}

impl Drop for SharedMemory {
    fn drop(&mut self) {
        if let Err(e) = self.unmap() {
            warn!("Failed to unmap shared memory: {e}");
        }
        // The handle closes itself when the field drops.
    }
}

impl fmt::Debug for SharedMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedMemory")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("mode", &self.mode)
            .field("created", &self.created)
            .field("mapped", &self.is_mapped())
            .finish_non_exhaustive()
    }
}
