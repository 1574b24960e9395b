//! Dynamic library loading with a per-library symbol cache.

use std::collections::HashMap;
use std::ffi::c_void;
use std::fmt;
use std::path::Path;
use std::ptr::NonNull;

use tracing::debug;

use crate::error::{OsError, Result};

/// Address of an exported symbol.
///
/// Valid only while the [`SharedLibrary`] that resolved it stays loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolAddress(NonNull<c_void>);

// SAFETY: the address is opaque here and never dereferenced; a loaded
// library's symbols are valid from any thread of the process.
#[allow(unsafe_code)]
unsafe impl Send for SymbolAddress {}
#[allow(unsafe_code)]
unsafe impl Sync for SymbolAddress {}

impl SymbolAddress {
    pub const fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }

    /// Numeric address, for logging and comparison.
    pub fn addr(self) -> usize {
        self.0.as_ptr() as usize
    }
}

impl fmt::Display for SymbolAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:p}", self.0)
    }
}

/// A loaded dynamic library.
///
/// Successful lookups are cached by name, so repeated resolution of the
/// same symbol returns the same address without asking the loader again.
/// Failed lookups are not cached. The library is unloaded on drop or by
/// [`unload`](Self::unload); either way every cached address becomes
/// invalid.
pub struct SharedLibrary {
    path: String,
    library: libloading::Library,
    symbols: HashMap<String, SymbolAddress>,
}

impl SharedLibrary {
    /// Load the library at `path` using the platform's search rules.
    ///
    /// A bare file name is looked up on the loader's search path; a path
    /// with directory components is used as given.
    ///
    /// Loading runs the library's initialisers, which may do anything.
    #[allow(unsafe_code)]
    pub fn load(path: &str) -> Result<Self> {
        debug!(path, "Loading shared library");
        // SAFETY: running foreign initialisers is inherent to loading a
        // library; callers choose which libraries they load.
        let library = unsafe { libloading::Library::new(path) }
            .map_err(|e| classify_load_error(path, &e))?;

        Ok(Self {
            path: path.to_string(),
            library,
            symbols: HashMap::new(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Look up `name`, consulting the cache first.
    #[allow(unsafe_code)]
    pub fn resolve(&mut self, name: &str) -> Result<SymbolAddress> {
        if let Some(&address) = self.symbols.get(name) {
            return Ok(address);
        }

        let not_found = || OsError::SymbolNotFound {
            symbol: name.to_string(),
            path: self.path.clone(),
        };

        // SAFETY: the symbol is read as an opaque address and never called
        // or dereferenced here.
        let raw = unsafe { self.library.get::<*mut c_void>(name.as_bytes()) }
            .map(|symbol| *symbol)
            .map_err(|e| {
                debug!(symbol = name, path = %self.path, "Symbol lookup failed: {e}");
                not_found()
            })?;
        let address = NonNull::new(raw).map(SymbolAddress).ok_or_else(not_found)?;

        debug!(symbol = name, path = %self.path, %address, "Resolved symbol");
        self.symbols.insert(name.to_string(), address);
        Ok(address)
    }

    /// Resolve `name` and reinterpret its address as `T`, typically an
    /// `extern "C" fn` pointer.
    ///
    /// # Safety
    ///
    /// `T` must be a pointer-sized type matching the symbol's real type, and
    /// the value must not be used after the library is unloaded.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not pointer-sized.
    #[allow(unsafe_code)]
    pub unsafe fn resolve_as<T: Copy>(&mut self, name: &str) -> Result<T> {
        assert_eq!(
            size_of::<T>(),
            size_of::<*mut c_void>(),
            "resolve_as needs a pointer-sized target type"
        );
        let address = self.resolve(name)?.as_ptr();
        // SAFETY: sizes match (checked above); the caller vouches for the type.
        Ok(unsafe { std::mem::transmute_copy::<*mut c_void, T>(&address) })
    }

    /// Names currently held in the symbol cache.
    pub fn cached_symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    /// Unload now and report the loader's result.
    pub fn unload(mut self) -> Result<()> {
        debug!(path = %self.path, "Unloading shared library");
        self.symbols.clear();
        let path = std::mem::take(&mut self.path);
        self.library.close().map_err(|e| OsError::LoadError {
            path,
            message: e.to_string(),
        })
    }
}

impl fmt::Debug for SharedLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedLibrary")
            .field("path", &self.path)
            .field("cached_symbols", &self.symbols.len())
            .finish_non_exhaustive()
    }
}

/// Loader messages (lowercased) that mean a file could not be found.
const MISSING_FILE_MARKERS: &[&str] = &[
    "no such file",
    "cannot open shared object file",
    "image not found",
];

fn classify_load_error(path: &str, err: &libloading::Error) -> OsError {
    let mut message = err.to_string();
    if let Some(source) = std::error::Error::source(err) {
        message = format!("{message}: {source}");
    }
    classify_load_message(path, message)
}

/// A bare name counts as missing only when the loader blames that name.
/// A message naming some other file is a missing dependency of a library
/// that was found, which is a load failure.
///
/// Windows reports missing modules and missing dependencies with the same
/// code, so there a failed bare name is always a `LoadError`.
fn classify_load_message(path: &str, message: String) -> OsError {
    let missing = if Path::new(path).components().count() > 1 {
        !Path::new(path).exists()
    } else {
        let names_request = message.starts_with(&format!("{path}:"))
            || message.starts_with(&format!("dlopen({path},"));
        let lowered = message.to_lowercase();
        names_request && MISSING_FILE_MARKERS.iter().any(|marker| lowered.contains(marker))
    };

    if missing {
        OsError::NotFound {
            name: path.to_string(),
        }
    } else {
        OsError::LoadError {
            path: path.to_string(),
            message,
        }
    }
}
