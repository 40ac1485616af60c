//! Tag Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A tag codec error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for tag codec operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file couldn't be opened or isn't a supported media format.
    #[display("unsupported or unreadable media file: {}", _0.display())]
    Unreadable(#[error(not(source))] PathBuf),
    /// File metadata (size) couldn't be read.
    #[display("could not stat file: {}", _0.display())]
    Metadata(#[error(not(source))] PathBuf),
    /// The format has no writable tag container.
    #[display("no writable tag in: {}", _0.display())]
    NoWritableTag(#[error(not(source))] PathBuf),
    /// Saving the updated tags failed.
    #[display("could not save tags to: {}", _0.display())]
    Save(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Metadata(_) | Self::Save(_))
    }
}
