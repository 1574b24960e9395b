//! Shared memory command handlers.
//!
//! Each command opens its own [`SharedMemory`] and drops it before returning,
//! so the only thing that outlives the process is the named segment itself.

use std::io::Write;

use utilkit_os::{OpenMode, SharedMemory};

use crate::error::CliError;

/// Create `name` with `size` bytes and leave it in place.
pub fn create(
    out: &mut impl Write,
    name: &str,
    size: usize,
    open_existing: bool,
) -> Result<(), CliError> {
    let mode = if open_existing {
        OpenMode::OpenOrCreate
    } else {
        OpenMode::CreateNew
    };
    let segment = SharedMemory::create_or_open(name, size, mode)?;
    let verb = if segment.created() { "Created" } else { "Opened existing" };
    writeln!(out, "{verb} segment {name} ({size} bytes)")?;
    Ok(())
}

/// Copy `data` into the segment at `offset`.
pub fn write(
    out: &mut impl Write,
    name: &str,
    size: usize,
    offset: usize,
    data: &str,
) -> Result<(), CliError> {
    let end = offset
        .checked_add(data.len())
        .filter(|&end| end <= size)
        .ok_or_else(|| {
            CliError::Arguments(format!(
                "{} bytes at offset {offset} do not fit in a {size}-byte view",
                data.len()
            ))
        })?;

    let mut segment = SharedMemory::create_or_open(name, size, OpenMode::OpenExisting)?;
    segment.map()?;
    let view = segment
        .as_mut_slice()
        .ok_or_else(|| CliError::Os(format!("segment {name} is not mapped")))?;
    view[offset..end].copy_from_slice(data.as_bytes());

    writeln!(out, "Wrote {} bytes to {name} at offset {offset}", data.len())?;
    Ok(())
}

/// Print bytes from the segment as (lossy) UTF-8.
///
/// Without `len`, reads to the end of the view and stops at the first NUL.
pub fn read(
    out: &mut impl Write,
    name: &str,
    size: usize,
    offset: usize,
    len: Option<usize>,
) -> Result<(), CliError> {
    if offset > size {
        return Err(CliError::Arguments(format!(
            "offset {offset} is past the end of a {size}-byte view"
        )));
    }

    let mut segment = SharedMemory::create_or_open(name, size, OpenMode::OpenExisting)?;
    segment.map()?;
    let view = segment
        .as_slice()
        .ok_or_else(|| CliError::Os(format!("segment {name} is not mapped")))?;

    let bytes = match len {
        Some(len) => {
            let end = offset
                .checked_add(len)
                .filter(|&end| end <= size)
                .ok_or_else(|| {
                    CliError::Arguments(format!("{len} bytes at offset {offset} exceed the view"))
                })?;
            &view[offset..end]
        }
        None => {
            let rest = &view[offset..];
            let text_end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
            &rest[..text_end]
        }
    };

    writeln!(out, "{}", String::from_utf8_lossy(bytes))?;
    Ok(())
}

/// Delete the segment's name.
pub fn remove(out: &mut impl Write, name: &str) -> Result<(), CliError> {
    SharedMemory::remove(name)?;
    writeln!(out, "Removed segment {name}")?;
    Ok(())
}
