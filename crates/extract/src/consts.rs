/// Token used in filenames to encode a full-width space (U+3000).
pub(crate) const FULL_WIDTH_SPACE_TOKEN: &str = "___";
/// Token used in filenames to encode an ordinary space.
pub(crate) const SPACE_TOKEN: &str = "__";
pub(crate) const FULL_WIDTH_SPACE: &str = "\u{3000}";

/// Separates multiple values inside a single captured list field.
pub const LIST_DELIMITER: char = ';';
/// Separator used when a list field is rendered as one string.
pub const LIST_SEPARATOR: &str = "; ";

/// Value written by tag readers for an artist they could not identify.
pub const UNKNOWN_SENTINEL: &str = "<unknown>";

/// Rule-file lines starting with one of these are comments.
pub(crate) const COMMENT_MARKERS: [&str; 2] = ["# ", "// "];

pub(crate) mod groups {
    pub const TITLE: &str = "title";
    pub const ALBUM_ARTISTS: &str = "albumArtists";
    pub const ARTISTS: &str = "artists";
    pub const ALBUM: &str = "album";
    pub const GENRES: &str = "genres";
    pub const YEAR: &str = "year";
    pub const TRACK: &str = "trackNo";
}
