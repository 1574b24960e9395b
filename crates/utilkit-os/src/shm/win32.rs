//! Win32 named file mappings backed by the paging file.

use std::ffi::CString;
use std::io;
use std::ptr::NonNull;

use tracing::debug;
use windows::Win32::Foundation::{
    BOOL, ERROR_ALREADY_EXISTS, GetLastError, HANDLE, INVALID_HANDLE_VALUE,
};
use windows::Win32::System::Memory::{
    CreateFileMappingA, FILE_MAP_ALL_ACCESS, MEMORY_MAPPED_VIEW_ADDRESS, MapViewOfFile,
    OpenFileMappingA, PAGE_READWRITE, UnmapViewOfFile,
};
use windows::core::PCSTR;

use super::OpenMode;
use crate::error::{OsError, Result};
use crate::handle::{AutoHandle, Win32Handle};

pub(super) fn open(
    name: &str,
    size: usize,
    mode: OpenMode,
) -> Result<(AutoHandle<Win32Handle>, bool)> {
    let c_name = CString::new(name).map_err(|_| OsError::InvalidArgument {
        name: name.to_string(),
        reason: "segment name contains a NUL byte",
    })?;

    match mode {
        OpenMode::OpenExisting => Ok((open_existing(name, &c_name)?, false)),
        OpenMode::CreateNew => {
            let (handle, existed) = create(name, &c_name, size)?;
            if existed {
                // `handle` closes the extra reference on drop.
                return Err(OsError::AlreadyExists {
                    name: name.to_string(),
                });
            }
            Ok((handle, true))
        }
        OpenMode::OpenOrCreate => {
            let (handle, existed) = create(name, &c_name, size)?;
            if existed {
                debug!(name, "Segment exists, opened it");
            }
            Ok((handle, !existed))
        }
    }
}

/// Create the mapping, or open it when the name is already taken.
#[allow(unsafe_code)]
fn create(name: &str, c_name: &CString, size: usize) -> Result<(AutoHandle<Win32Handle>, bool)> {
    let size = u64::try_from(size).map_err(|_| OsError::InvalidArgument {
        name: name.to_string(),
        reason: "segment size does not fit in 64 bits",
    })?;
    let high = u32::try_from(size >> 32).unwrap_or(u32::MAX);
    let low = u32::try_from(size & u64::from(u32::MAX)).unwrap_or(u32::MAX);

    // SAFETY: `c_name` is NUL-terminated and outlives the call.
    let raw = unsafe {
        CreateFileMappingA(
            INVALID_HANDLE_VALUE,
            None,
            PAGE_READWRITE,
            high,
            low,
            PCSTR(c_name.as_ptr().cast()),
        )
    }
    .map_err(|e| OsError::from_io("CreateFileMapping", name, e.into()))?;
    // SAFETY: reads the calling thread's last-error value only.
    let existed = unsafe { GetLastError() } == ERROR_ALREADY_EXISTS;

    Ok((AutoHandle::new(raw), existed))
}

#[allow(unsafe_code)]
fn open_existing(name: &str, c_name: &CString) -> Result<AutoHandle<Win32Handle>> {
    // SAFETY: `c_name` is NUL-terminated and outlives the call.
    let raw = unsafe {
        OpenFileMappingA(
            FILE_MAP_ALL_ACCESS.0,
            BOOL::from(false),
            PCSTR(c_name.as_ptr().cast()),
        )
    }
    .map_err(|e| OsError::from_io("OpenFileMapping", name, e.into()))?;
    Ok(AutoHandle::new(raw))
}

#[allow(unsafe_code)]
pub(super) fn map(handle: &AutoHandle<Win32Handle>, size: usize) -> io::Result<NonNull<u8>> {
    let raw: HANDLE = handle
        .try_get()
        .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;

    // SAFETY: `raw` is a live mapping handle owned by `handle`.
    let view = unsafe { MapViewOfFile(raw, FILE_MAP_ALL_ACCESS, 0, 0, size) };
    NonNull::new(view.Value.cast::<u8>()).ok_or_else(io::Error::last_os_error)
}

#[allow(unsafe_code)]
pub(super) fn unmap(view: NonNull<u8>, _size: usize) -> io::Result<()> {
    let address = MEMORY_MAPPED_VIEW_ADDRESS {
        Value: view.as_ptr().cast(),
    };
    // SAFETY: `view` is the base address returned by `MapViewOfFile`.
    unsafe { UnmapViewOfFile(address) }.map_err(io::Error::from)
}

/// Named mappings vanish with their last handle; there is no name to delete.
pub(super) fn remove(_name: &str) -> Result<()> {
    Ok(())
}
