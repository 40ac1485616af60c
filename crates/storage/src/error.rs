//! Storage Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::{Path, PathBuf};

/// A storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// File does not exist
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Access denied
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// The destination of a move is already occupied.
    #[display("file already exists: {}", _0.display())]
    AlreadyExists(#[error(not(source))] PathBuf),
    /// Underlying I/O error
    #[display("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: IoError },
    /// Path contains components that can't be represented (`..`, non-UTF-8,
    /// missing file name).
    #[display("invalid path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// A path was decomposed against a root it doesn't live under. This is
    /// always a bug in the caller.
    #[display("path {} is not within working root {}", path.display(), root.display())]
    OutsideRoot { root: PathBuf, path: PathBuf },
}
impl ErrorKind {
    /// Classify an I/O error that occurred while operating on `path`.
    pub fn io(err: IoError, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists(path),
            _ => Self::Io { path, source: err },
        }
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns `true` for errors caused by the caller rather than the
    /// filesystem; these should abort the whole operation.
    pub fn is_programming_error(&self) -> bool {
        matches!(self, Self::OutsideRoot { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_classification() {
        let path = Path::new("/music/a.mp3");
        let kind = ErrorKind::io(IoError::from(std::io::ErrorKind::NotFound), path);
        assert!(matches!(kind, ErrorKind::NotFound(ref p) if p == path));
        let kind = ErrorKind::io(IoError::from(std::io::ErrorKind::AlreadyExists), path);
        assert_eq!(kind.to_string(), "file already exists: /music/a.mp3");
        let kind = ErrorKind::io(IoError::other("disk on fire"), path);
        assert!(kind.is_retryable());
        assert_eq!(kind.to_string(), "I/O error on /music/a.mp3: disk on fire");
    }

    #[test]
    fn test_outside_root_is_programming_error() {
        let kind = ErrorKind::OutsideRoot {
            root: PathBuf::from("/music"),
            path: PathBuf::from("/other/a.mp3"),
        };
        assert!(kind.is_programming_error());
        assert_eq!(kind.to_string(), "path /other/a.mp3 is not within working root /music");
    }
}
