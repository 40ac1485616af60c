use crate::consts::{LIST_SEPARATOR, UNKNOWN_SENTINEL};
use std::path::PathBuf;

/// A single media file and its (mutable) tag values.
///
/// Created once per file by a tag reader and owned by the caller for the rest
/// of the run. Strings are empty rather than missing, and lists are empty
/// rather than missing; numeric fields use `0` for "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaEntity {
    /// Absolute location of the file on disk.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    pub title: String,
    pub artists: Vec<String>,
    pub album_artists: Vec<String>,
    pub album: String,
    pub year: u32,
    pub track: u32,
    pub genres: Vec<String>,
}
impl MediaEntity {
    /// Create an entity without any tag values.
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            ..Self::default()
        }
    }

    /// The combined album-artist/artist string used to group tracks by artist
    /// across a batch.
    ///
    /// Album artists take precedence when they have values; otherwise the
    /// track artists are used. Returns an empty string when neither is set.
    pub fn artist_summary(&self) -> String {
        if has_values(&self.album_artists) {
            self.album_artists.join(LIST_SEPARATOR)
        } else if has_values(&self.artists) {
            self.artists.join(LIST_SEPARATOR)
        } else {
            String::new()
        }
    }

    /// The filename without its extension, as used for pattern matching.
    pub fn file_stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }
}

/// Returns `true` if a list field carries usable values.
///
/// A list only counts when it is non-empty, its concatenation isn't entirely
/// whitespace, and it doesn't contain the tag reader's [unknown artist
/// sentinel](UNKNOWN_SENTINEL).
pub fn has_values(values: &[String]) -> bool {
    if values.is_empty() {
        return false;
    }
    let joined = values.concat();
    !joined.trim().is_empty() && !joined.contains(UNKNOWN_SENTINEL)
}
