//! CLI-specific error types and mappings.
//!
//! Maps library errors onto exit codes and user-facing messages.

use thiserror::Error;
use utilkit_os::OsError;
use utilkit_timing::FormatConfigError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument validation error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Named resource missing or already present.
    #[error("{0}")]
    Resource(String),

    /// Permission problem.
    #[error("Permission denied: {0}")]
    Permission(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// OS-level failure (mapping, loading, limits).
    #[error("OS error: {0}")]
    Os(String),
}

impl CliError {
    /// Map error to an exit code following sysexits.h.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 64,  // EX_USAGE
            Self::Resource(_) => 69,   // EX_UNAVAILABLE
            Self::Permission(_) => 77, // EX_NOPERM
            Self::Io(_) => 74,         // EX_IOERR
            Self::Config(_) => 78,     // EX_CONFIG
            Self::Os(_) => 71,         // EX_OSERR
        }
    }
}

impl From<OsError> for CliError {
    fn from(err: OsError) -> Self {
        let message = err.to_string();
        match err {
            OsError::NotFound { .. }
            | OsError::AlreadyExists { .. }
            | OsError::SymbolNotFound { .. } => Self::Resource(message),
            OsError::PermissionDenied { .. } => Self::Permission(message),
            OsError::InvalidArgument { .. } | OsError::SizeMismatch { .. } => {
                Self::Arguments(message)
            }
            OsError::Io { .. } => Self::Io(message),
            OsError::ResourceLimitExceeded { .. }
            | OsError::MappingFailed { .. }
            | OsError::LoadError { .. }
            | OsError::InvalidHandle => Self::Os(message),
        }
    }
}

impl From<FormatConfigError> for CliError {
    fn from(err: FormatConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_errors_map_to_exit_codes() {
        let missing: CliError = OsError::NotFound { name: "/seg".into() }.into();
        assert_eq!(missing.exit_code(), 69);
        assert_eq!(missing.to_string(), "'/seg' was not found");

        let size: CliError = OsError::SizeMismatch {
            name: "/seg".into(),
            expected: 10,
            actual: 4,
        }
        .into();
        assert_eq!(size.exit_code(), 64);

        let load: CliError = OsError::LoadError {
            path: "libx.so".into(),
            message: "bad ELF".into(),
        }
        .into();
        assert_eq!(load.exit_code(), 71);
    }

    #[test]
    fn test_format_config_error_is_config() {
        let err: CliError = FormatConfigError::PrecisionOutOfRange { precision: 12, max: 9 }.into();
        assert_eq!(err.exit_code(), 78);
    }
}
