//! Exclusive ownership of a single raw OS handle.

use std::fmt;
use std::io;
use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::error::{OsError, Result};

/// Family of raw handles sharing a representation and a release call.
///
/// The wrapper never interprets raw values beyond comparing them with the
/// empty sentinel; they are only forwarded to [`HandleKind::release`].
pub trait HandleKind {
    /// Raw handle value as the OS hands it out.
    type Raw: Copy + Eq + fmt::Debug;

    /// Value meaning "no resource".
    const EMPTY: Self::Raw;

    /// Whether `raw` refers to no resource. Kinds with more than one invalid
    /// value override this.
    fn is_empty(raw: Self::Raw) -> bool {
        raw == Self::EMPTY
    }

    /// Give the resource back to the OS.
    fn release(raw: Self::Raw) -> io::Result<()>;
}

/// POSIX file descriptor, released with `close(2)`.
#[cfg(unix)]
#[derive(Debug, Clone, Copy)]
pub struct FileDescriptor;

#[cfg(unix)]
impl HandleKind for FileDescriptor {
    type Raw = std::os::fd::RawFd;

    const EMPTY: Self::Raw = -1;

    fn is_empty(raw: Self::Raw) -> bool {
        raw < 0
    }

    #[allow(unsafe_code)]
    fn release(raw: Self::Raw) -> io::Result<()> {
        // SAFETY: the descriptor is owned by the releasing AutoHandle and is
        // never used again after this call.
        let rc = unsafe { nix::libc::close(raw) };
        nix::errno::Errno::result(rc)
            .map(drop)
            .map_err(io::Error::from)
    }
}

/// Win32 kernel object handle, released with `CloseHandle`.
#[cfg(windows)]
#[derive(Debug, Clone, Copy)]
pub struct Win32Handle;

#[cfg(windows)]
impl HandleKind for Win32Handle {
    type Raw = windows::Win32::Foundation::HANDLE;

    const EMPTY: Self::Raw = windows::Win32::Foundation::HANDLE(std::ptr::null_mut());

    fn is_empty(raw: Self::Raw) -> bool {
        raw.is_invalid()
    }

    #[allow(unsafe_code)]
    fn release(raw: Self::Raw) -> io::Result<()> {
        // SAFETY: the handle is owned by the releasing AutoHandle and is
        // never used again after this call.
        unsafe { windows::Win32::Foundation::CloseHandle(raw) }.map_err(io::Error::from)
    }
}

/// Handle kind of the current platform.
#[cfg(unix)]
pub type PlatformHandle = FileDescriptor;

/// Handle kind of the current platform.
#[cfg(windows)]
pub type PlatformHandle = Win32Handle;

/// Owns one raw handle and releases it exactly once.
///
/// Ownership moves with the value; there is no `Clone`. [`take`](Self::take)
/// moves the resource out of a place that must stay valid, leaving it empty.
/// Dropping a non-empty wrapper releases the handle, logging any failure.
///
/// ```
/// # #[cfg(unix)] {
/// use std::os::fd::IntoRawFd;
/// use utilkit_os::{AutoHandle, FileDescriptor};
///
/// let file = std::fs::File::open("Cargo.toml").unwrap();
/// let mut owner = AutoHandle::<FileDescriptor>::new(file.into_raw_fd());
/// let moved = owner.take();
/// assert!(owner.is_empty());
/// assert!(!moved.is_empty());
/// # }
/// ```
pub struct AutoHandle<K: HandleKind> {
    raw: K::Raw,
    _kind: PhantomData<K>,
}

impl<K: HandleKind> AutoHandle<K> {
    /// Take ownership of `raw`.
    pub const fn new(raw: K::Raw) -> Self {
        Self {
            raw,
            _kind: PhantomData,
        }
    }

    /// Wrapper owning nothing.
    pub const fn empty() -> Self {
        Self::new(K::EMPTY)
    }

    pub fn is_empty(&self) -> bool {
        K::is_empty(self.raw)
    }

    /// Raw handle for passing to OS calls. Ownership stays here.
    ///
    /// # Panics
    ///
    /// Panics if the wrapper is empty: using an empty handle is a bug.
    pub fn get(&self) -> K::Raw {
        assert!(!self.is_empty(), "AutoHandle::get called on an empty handle");
        self.raw
    }

    /// Raw handle, or [`OsError::InvalidHandle`] if the wrapper is empty.
    pub fn try_get(&self) -> Result<K::Raw> {
        if self.is_empty() {
            return Err(OsError::InvalidHandle);
        }
        Ok(self.raw)
    }

    /// Release the current handle (if any), then own `raw`.
    ///
    /// Passing the empty sentinel leaves the wrapper empty.
    pub fn reset(&mut self, raw: K::Raw) {
        self.release_quietly();
        self.raw = raw;
    }

    /// Release now and report the OS result.
    ///
    /// The wrapper is empty afterwards even if the OS call failed; the
    /// release is never retried. Releasing an empty wrapper is a no-op.
    pub fn release(&mut self) -> Result<()> {
        let raw = std::mem::replace(&mut self.raw, K::EMPTY);
        if K::is_empty(raw) {
            return Ok(());
        }
        debug!(handle = ?raw, "Releasing handle");
        K::release(raw).map_err(|source| OsError::Io {
            op: "release",
            name: format!("{raw:?}"),
            source,
        })
    }

    /// Move the handle out, leaving this wrapper empty.
    #[must_use]
    pub fn take(&mut self) -> Self {
        Self::new(std::mem::replace(&mut self.raw, K::EMPTY))
    }

    /// Give up ownership without releasing.
    #[must_use]
    pub fn into_raw(mut self) -> K::Raw {
        std::mem::replace(&mut self.raw, K::EMPTY)
    }

    fn release_quietly(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to release handle: {e}");
        }
    }
}

impl<K: HandleKind> Default for AutoHandle<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: HandleKind> Drop for AutoHandle<K> {
    fn drop(&mut self) {
        self.release_quietly();
    }
}

impl<K: HandleKind> fmt::Debug for AutoHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AutoHandle").field(&self.raw).finish()
    }
}

#[cfg(unix)]
impl From<std::os::fd::OwnedFd> for AutoHandle<FileDescriptor> {
    fn from(fd: std::os::fd::OwnedFd) -> Self {
        use std::os::fd::IntoRawFd;

        Self::new(fd.into_raw_fd())
    }
}
