//! POSIX shared memory: `shm_open`, `mmap`, `shm_unlink`.

use std::fs::File;
use std::io;
use std::num::NonZeroUsize;
use std::os::fd::{BorrowedFd, OwnedFd};
use std::ptr::NonNull;

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::mman::{self, MapFlags, ProtFlags};
use nix::sys::stat::Mode;
use tracing::{debug, warn};

use super::OpenMode;
use crate::error::{OsError, Result};
use crate::handle::{AutoHandle, FileDescriptor};

/// Owner read/write only.
const SEGMENT_PERMISSIONS: Mode = Mode::S_IRUSR.union(Mode::S_IWUSR);

pub(super) fn open(
    name: &str,
    size: usize,
    mode: OpenMode,
) -> Result<(AutoHandle<FileDescriptor>, bool)> {
    let (fd, created) = match mode {
        OpenMode::CreateNew => (shm_open(name, true)?, true),
        OpenMode::OpenExisting => (shm_open(name, false)?, false),
        OpenMode::OpenOrCreate => match shm_open(name, true) {
            Ok(fd) => (fd, true),
            Err(OsError::AlreadyExists { .. }) => {
                debug!(name, "Segment exists, opening it");
                (shm_open(name, false)?, false)
            }
            Err(e) => return Err(e),
        },
    };

    let file = File::from(fd);
    if created {
        size_new_segment(name, &file, size)?;
    } else {
        check_existing_size(name, &file, size)?;
    }

    Ok((AutoHandle::from(OwnedFd::from(file)), created))
}

fn shm_open(name: &str, create: bool) -> Result<OwnedFd> {
    let mut flags = OFlag::O_RDWR;
    if create {
        flags |= OFlag::O_CREAT | OFlag::O_EXCL;
    }
    mman::shm_open(name, flags, SEGMENT_PERMISSIONS)
        .map_err(|errno| OsError::from_io("shm_open", name, errno.into()))
}

/// Grow a fresh segment to `size` zero bytes, unlinking it if that fails.
fn size_new_segment(name: &str, file: &File, size: usize) -> Result<()> {
    let len = u64::try_from(size).map_err(|_| OsError::InvalidArgument {
        name: name.to_string(),
        reason: "segment size does not fit in a file length",
    })?;
    if let Err(e) = file.set_len(len) {
        if let Err(unlink) = mman::shm_unlink(name) {
            warn!(name, "Failed to remove half-created segment: {unlink}");
        }
        return Err(OsError::from_io("ftruncate", name, e));
    }
    Ok(())
}

fn check_existing_size(name: &str, file: &File, size: usize) -> Result<()> {
    let actual = file
        .metadata()
        .map_err(|e| OsError::from_io("fstat", name, e))?
        .len();
    if actual < u64::try_from(size).unwrap_or(u64::MAX) {
        return Err(OsError::SizeMismatch {
            name: name.to_string(),
            expected: size,
            actual,
        });
    }
    Ok(())
}

#[allow(unsafe_code)]
pub(super) fn map(handle: &AutoHandle<FileDescriptor>, size: usize) -> io::Result<NonNull<u8>> {
    let raw = handle
        .try_get()
        .map_err(|_| io::Error::from_raw_os_error(Errno::EBADF as i32))?;
    let length =
        NonZeroUsize::new(size).ok_or_else(|| io::Error::from(io::ErrorKind::InvalidInput))?;

    // SAFETY: `raw` is open for the lifetime of `handle`, which outlives this call.
    let fd = unsafe { BorrowedFd::borrow_raw(raw) };
    // SAFETY: a fresh shared mapping at a kernel-chosen address aliases no
    // existing Rust memory.
    let addr = unsafe {
        mman::mmap(
            None,
            length,
            ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
            MapFlags::MAP_SHARED,
            fd,
            0,
        )
    }?;
    Ok(addr.cast())
}

#[allow(unsafe_code)]
pub(super) fn unmap(view: NonNull<u8>, size: usize) -> io::Result<()> {
    // SAFETY: `view` and `size` describe a mapping returned by `map` that the
    // caller has stopped handing out.
    unsafe { mman::munmap(view.cast(), size) }?;
    Ok(())
}

pub(super) fn remove(name: &str) -> Result<()> {
    mman::shm_unlink(name).map_err(|errno| OsError::from_io("shm_unlink", name, errno.into()))
}
