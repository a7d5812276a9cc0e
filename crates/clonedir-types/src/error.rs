//! Error types and handling for clonedir
//!
//! Every failure during a mirror run is fatal for the operation that hit it:
//! nothing is retried. The severity decides whether a failure may be confined
//! to a single destination or must stop the whole run.

use std::path::{Path, PathBuf};

/// Error severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Low severity - operation can continue
    Low,
    /// Medium severity
    Medium,
    /// High severity - the current destination must be abandoned
    High,
    /// Critical severity - an internal invariant broke, the run must stop
    Critical,
}

/// Main error type for clonedir operations
#[derive(thiserror::Error, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// A source or destination entry could not be read
    #[error("Failed to read '{path}': {message}")]
    Read {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// A destination entry could not be created, written or removed
    #[error("Failed to write '{path}': {message}")]
    Write {
        /// Path that could not be written
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// A directory still had entries when it was removed
    #[error("Refusing to remove non-empty directory: {path}")]
    NonEmptyDirectory {
        /// Directory that was not empty
        path: PathBuf,
    },

    /// The source root is missing or is not a directory
    #[error("Invalid source '{path}': {message}")]
    InvalidSource {
        /// Source root given by the caller
        path: PathBuf,
        /// Why the source was rejected
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// A failure tied to one destination root
    #[error("Destination '{destination}' failed: {source}")]
    Destination {
        /// Destination root that was being mirrored
        destination: PathBuf,
        /// The failure itself
        source: Box<Error>,
    },

    /// I/O operation failed outside of a known path
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Read failures
    Read,
    /// Write failures
    Write,
    /// Removal of a non-empty directory
    NonEmptyDirectory,
    /// Configuration and argument errors
    Config,
    /// Other I/O errors
    Io,
}

impl Error {
    /// Get the error kind, looking through destination wrappers
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Read { .. } => ErrorKind::Read,
            Self::Write { .. } => ErrorKind::Write,
            Self::NonEmptyDirectory { .. } => ErrorKind::NonEmptyDirectory,
            Self::InvalidSource { .. } | Self::Config { .. } => ErrorKind::Config,
            Self::Destination { source, .. } => source.kind(),
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Read { .. } | Self::Write { .. } | Self::Io { .. } => ErrorSeverity::High,
            Self::InvalidSource { .. } | Self::Config { .. } => ErrorSeverity::High,
            Self::NonEmptyDirectory { .. } => ErrorSeverity::Critical,
            Self::Destination { source, .. } => source.severity(),
        }
    }

    /// The destination this error is attributed to, if any
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Self::Destination { destination, .. } => Some(destination),
            _ => None,
        }
    }

    /// Create a read error for `path`
    pub fn read<P: AsRef<Path>>(path: P, error: &std::io::Error) -> Self {
        Self::Read {
            path: path.as_ref().to_path_buf(),
            message: error.to_string(),
        }
    }

    /// Create a write error for `path`
    pub fn write<P: AsRef<Path>>(path: P, error: &std::io::Error) -> Self {
        Self::Write {
            path: path.as_ref().to_path_buf(),
            message: error.to_string(),
        }
    }

    /// Create an invalid source error
    pub fn invalid_source<P: AsRef<Path>, S: Into<String>>(path: P, message: S) -> Self {
        Self::InvalidSource {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Attribute this error to a destination root
    pub fn in_destination<P: AsRef<Path>>(self, destination: P) -> Self {
        match self {
            wrapped @ Self::Destination { .. } => wrapped,
            other => Self::Destination {
                destination: destination.as_ref().to_path_buf(),
                source: Box::new(other),
            },
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_destination_wrapper_is_transparent(message in ".*") {
            let errors = vec![
                Error::Read { path: PathBuf::from("a"), message: message.clone() },
                Error::Write { path: PathBuf::from("a"), message: message.clone() },
                Error::Config { message: message.clone() },
                Error::Io { message: message.clone() },
            ];

            for error in errors {
                let kind = error.kind();
                let severity = error.severity();
                let wrapped = error.in_destination("/backup");

                prop_assert_eq!(wrapped.kind(), kind);
                prop_assert_eq!(wrapped.severity(), severity);
                prop_assert_eq!(wrapped.destination(), Some(Path::new("/backup")));
            }
        }
    }

    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Low < ErrorSeverity::Medium);
        assert!(ErrorSeverity::Medium < ErrorSeverity::High);
        assert!(ErrorSeverity::High < ErrorSeverity::Critical);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "test file");
        let error = Error::from(io_error);

        assert_eq!(error.kind(), ErrorKind::Io);
        assert_eq!(error.severity(), ErrorSeverity::High);
        assert!(error.to_string().contains("test file"));
    }

    #[test]
    fn test_read_error_names_path() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = Error::read("/src/secret.txt", &io_error);

        assert_eq!(error.kind(), ErrorKind::Read);
        assert!(error.to_string().contains("/src/secret.txt"));
        assert!(error.to_string().contains("denied"));
    }

    #[test]
    fn test_non_empty_directory_is_critical() {
        let error = Error::NonEmptyDirectory {
            path: PathBuf::from("/dst/a"),
        };

        assert_eq!(error.kind(), ErrorKind::NonEmptyDirectory);
        assert_eq!(error.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_destination_wrapping_is_not_nested() {
        let error = Error::config("boom")
            .in_destination("/first")
            .in_destination("/second");

        assert_eq!(error.destination(), Some(Path::new("/first")));
        assert!(error.to_string().starts_with("Destination '/first' failed"));
    }
}
