//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors from the extract and storage
//! crates are kept as children in the tree.

use derive_more::{Display, Error};
use retag_extract::error::{Error as ExtractError, ErrorKind as ExtractErrorKind};
use retag_storage::error::{Error as StorageError, ErrorKind as StorageErrorKind};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a library failure.
///
/// ### Per-file Errors
/// Recorded against the file being processed; the batch continues.
/// - [`ErrorKind::Extract`]
/// - [`ErrorKind::Collision`]
/// - [`ErrorKind::Storage`]
/// - [`ErrorKind::ReadTags`], [`ErrorKind::WriteTags`]
/// - [`ErrorKind::UnknownPlaceholder`]
///
/// ### Fatal Errors
/// - [`ErrorKind::InvalidTemplate`] - configuration is unusable.
/// - [`ErrorKind::OutsideRoot`] - programming error, aborts the batch.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The filename couldn't be parsed into tag values.
    #[display("{_0}")]
    Extract(ExtractErrorKind),
    /// The planned destination is occupied by another file.
    #[display("destination already exists: {}", _0.display())]
    Collision(#[error(not(source))] PathBuf),
    /// A filesystem operation (move, mkdir, delete) failed.
    #[display("filesystem operation failed")]
    Storage,
    /// Walking the working directory failed.
    #[display("could not scan directory")]
    Scan,
    /// Tags couldn't be read from a media file.
    #[display("could not read tags from {}", _0.display())]
    ReadTags(#[error(not(source))] PathBuf),
    /// Tags couldn't be written to a media file.
    #[display("could not write tags to {}", _0.display())]
    WriteTags(#[error(not(source))] PathBuf),
    /// A rename template is empty or otherwise unusable.
    #[display("invalid rename template: {_0}")]
    InvalidTemplate(#[error(not(source))] String),
    /// A rename template contains a `%TOKEN%` outside the field vocabulary.
    #[display("unknown placeholder %{_0}% in rename template")]
    UnknownPlaceholder(#[error(not(source))] String),
    /// A path was handled relative to a root it doesn't belong to.
    #[display("path is outside the working root")]
    OutsideRoot,
}

impl ErrorKind {
    /// Wrap an extract error, preserving its `Exn` frame as a child.
    #[track_caller]
    pub fn extract(err: ExtractError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Extract(inner))
    }

    /// Wrap a storage error, preserving its `Exn` frame as a child.
    ///
    /// Occupied destinations become [`ErrorKind::Collision`] and root
    /// violations become [`ErrorKind::OutsideRoot`], so callers can tell them
    /// apart without digging into the tree.
    #[track_caller]
    pub fn storage(err: StorageError) -> Error {
        let kind = match &*err {
            StorageErrorKind::AlreadyExists(path) => ErrorKind::Collision(path.clone()),
            StorageErrorKind::OutsideRoot { .. } => ErrorKind::OutsideRoot,
            _ => ErrorKind::Storage,
        };
        err.raise(kind)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage | Self::Scan | Self::ReadTags(_) | Self::WriteTags(_))
    }

    /// Returns `true` if the whole batch must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::OutsideRoot | Self::InvalidTemplate(_))
    }
}
