//! Filesystem primitives for reorganizing a media library in place.
//!
//! - [`PathComponents`]: root / sub-directories / file name decomposition.
//! - [`WorkingRoot`]: moves scoped to a root directory that never overwrite.
//! - [`Sanitizer`]: replaces characters that can't appear in filenames.
//! - [`remove_empty_directories`]: post-order cleanup of emptied directories.

pub mod error;
mod fs;
mod janitor;
mod path;
mod sanitize;

pub use crate::fs::WorkingRoot;
pub use crate::janitor::{Cleanup, JUNK_FILES, is_junk, remove_empty_directories};
pub use crate::path::PathComponents;
pub use crate::sanitize::{DEFAULT_REPLACEMENT, Sanitizer, is_invalid, sanitize};

/// Media file extensions (without the leading dot) handled when none are
/// configured.
pub const DEFAULT_EXTENSIONS: [&str; 8] = ["mp3", "flac", "m4a", "mp4", "ogg", "opus", "wav", "wma"];
