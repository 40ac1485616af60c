//! Conversion of named capture groups into typed tag values.

use crate::consts::{FULL_WIDTH_SPACE, FULL_WIDTH_SPACE_TOKEN, LIST_DELIMITER, SPACE_TOKEN, groups};
use crate::error::{ErrorKind, Result};
use crate::matcher::{PatternMatch, PatternMatcher};
use std::collections::HashMap;
use tracing::instrument;
use unicode_normalization::UnicodeNormalization;

/// Artist name to genre, used when a filename doesn't carry a genre itself.
pub type GenreLookup = HashMap<String, String>;

/// Tag values recovered from a filename.
///
/// `None` means the corresponding group didn't take part in the match (or
/// captured nothing but whitespace and separators).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub album_artists: Option<Vec<String>>,
    pub artists: Option<Vec<String>>,
    pub album: Option<String>,
    pub genres: Option<Vec<String>>,
    /// A `year` group that fails to parse still yields `Some(0)`, which is
    /// treated as "no year" downstream.
    pub year: Option<u32>,
    /// Unlike `year`, a `trackNo` group that fails to parse yields `None`.
    pub track: Option<u32>,
}
impl ExtractedFields {
    /// Returns `true` if no field was recovered at all. An unparsed year
    /// (`Some(0)`) counts as absent.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.album_artists.is_none()
            && self.artists.is_none()
            && self.album.is_none()
            && self.genres.is_none()
            && self.year.is_none_or(|year| year == 0)
            && self.track.is_none()
    }
}

/// Recovers [`ExtractedFields`] from filenames using an ordered
/// [`PatternMatcher`] and an optional artist to genre lookup.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    matcher: PatternMatcher,
    genres: GenreLookup,
}
impl FieldExtractor {
    pub fn new(matcher: PatternMatcher) -> Self {
        Self {
            matcher,
            genres: GenreLookup::new(),
        }
    }

    pub fn with_genres(mut self, genres: GenreLookup) -> Self {
        self.genres = genres;
        self
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    /// Matches `filename` against the rules and converts the first match.
    ///
    /// # Errors
    /// - [`ErrorKind::NoMatch`] if no rule matches.
    /// - [`ErrorKind::NoCaptures`] if the matching rule recovered no values.
    #[instrument(level = "debug", skip(self))]
    pub fn extract(&self, filename: &str) -> Result<ExtractedFields> {
        let found = self.matcher.require(filename)?;
        tracing::trace!(pattern = found.pattern(), "Filename matched");
        let fields = self.fields(&found);
        if fields.is_empty() {
            exn::bail!(ErrorKind::NoCaptures(filename.to_string()));
        }
        Ok(fields)
    }

    /// Converts the named groups of an existing match.
    ///
    /// Groups with names outside the recognized set are ignored.
    pub fn fields(&self, found: &PatternMatch<'_, '_>) -> ExtractedFields {
        let mut fields = ExtractedFields::default();
        for (name, value) in found.groups() {
            match name {
                groups::TITLE => fields.title = text(value),
                groups::ALBUM => fields.album = text(value),
                groups::ALBUM_ARTISTS => fields.album_artists = list(value),
                groups::ARTISTS => fields.artists = list(value),
                groups::GENRES => fields.genres = list(value),
                groups::YEAR => fields.year = Some(value.trim().parse().unwrap_or(0)),
                groups::TRACK => fields.track = value.trim().parse().ok(),
                _ => {},
            }
        }
        if fields.genres.as_ref().is_none_or(Vec::is_empty)
            && let Some(genre) = self.genre_for(fields.artists.as_deref())
        {
            fields.genres = Some(vec![genre]);
        }
        fields
    }

    /// Genre configured for the first artist, if any.
    fn genre_for(&self, artists: Option<&[String]>) -> Option<String> {
        let first = artists?.first()?;
        self.genres.get(first).cloned()
    }
}

/// Replaces the spacing tokens used in filenames: `___` becomes a full-width
/// space, `__` an ordinary one.
fn replace_tokens(s: &str) -> String {
    s.replace(FULL_WIDTH_SPACE_TOKEN, FULL_WIDTH_SPACE).replace(SPACE_TOKEN, " ")
}

fn normalize(s: &str) -> String {
    s.nfc().collect()
}

/// Scalar text value: trimmed, NFC-normalized, tokens replaced.
fn text(value: &str) -> Option<String> {
    let value = replace_tokens(&normalize(value.trim()));
    (!value.trim().is_empty()).then_some(value)
}

/// List value: tokens replaced, split on `;`, each item trimmed and
/// NFC-normalized, empty items dropped.
fn list(value: &str) -> Option<Vec<String>> {
    let items: Vec<String> = replace_tokens(value)
        .split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(normalize)
        .collect();
    (!items.is_empty()).then_some(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;

    fn extractor(rules: &[&str]) -> FieldExtractor {
        FieldExtractor::new(PatternMatcher::new(rules).unwrap())
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_end_to_end_filename() {
        let extractor = extractor(&[r"^(?<artists>.+) - (?<title>.+) \[(?<year>\d{4})\]$"]);
        let fields = extractor.extract("Artist X - Song Y [1999]").unwrap();
        assert_eq!(fields.artists, Some(strings(&["Artist X"])));
        assert_eq!(fields.title.as_deref(), Some("Song Y"));
        assert_eq!(fields.year, Some(1999));
        assert_eq!(fields.track, None);
        assert_eq!(fields.genres, None);
    }

    #[rstest]
    #[case("A__B", "A B")]
    #[case("A___B", "A\u{3000}B")]
    #[case("A_____B", "A\u{3000} B")]
    #[case("  padded  ", "padded")]
    // Tokens are replaced after trimming.
    #[case("Song__", "Song ")]
    #[case("single_underscore", "single_underscore")]
    // Decomposed "e" + combining acute accent is composed into a single code point.
    #[case("Cafe\u{0301}", "Caf\u{00E9}")]
    fn test_text_normalization(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(text(input).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("A; B", &["A", "B"])]
    #[case("A;;B;", &["A", "B"])]
    #[case(" A__B ;C___D", &["A B", "C\u{3000}D"])]
    fn test_list_splitting(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(list(input), Some(strings(expected)));
    }

    #[test]
    fn test_blank_values_are_absent() {
        assert_eq!(text("   "), None);
        assert_eq!(list(" ; ;"), None);
    }

    #[test]
    fn test_number_parse_asymmetry() {
        let extractor = extractor(&[r"^(?<title>\w+) (?<year>\S+) (?<trackNo>\S+)$"]);
        let fields = extractor.extract("Song nineteen seven").unwrap();
        assert_eq!(fields.year, Some(0));
        assert_eq!(fields.track, None);

        let fields = extractor.extract("Song 2001 07").unwrap();
        assert_eq!(fields.year, Some(2001));
        assert_eq!(fields.track, Some(7));
    }

    #[test]
    fn test_genre_lookup_fallback() {
        let genres = GenreLookup::from([("Artist X".to_string(), "Jazz".to_string())]);
        let extractor = extractor(&[r"^(?<artists>[^-]+) - (?<title>[^\[]+)(?: \[(?<genres>[^\]]+)\])?$"]).with_genres(genres);

        let fields = extractor.extract("Artist X; Artist Z - Song").unwrap();
        assert_eq!(fields.genres, Some(strings(&["Jazz"])));

        // An explicit genre always wins over the lookup.
        let fields = extractor.extract("Artist X - Song [Rock]").unwrap();
        assert_eq!(fields.genres, Some(strings(&["Rock"])));

        // Only the first artist is consulted.
        let fields = extractor.extract("Artist Z; Artist X - Song").unwrap();
        assert_eq!(fields.genres, None);
    }

    #[test]
    fn test_no_captures_is_parse_failure() {
        let extractor = extractor(&[r"^(?<title>\s*)-(?<unrelated>.*)$"]);
        let err = extractor.extract(" -x").unwrap_err();
        assert_eq!(*err, ErrorKind::NoCaptures(" -x".to_string()));
        assert!(err.is_parse_failure());
    }

    #[test]
    fn test_unparsed_year_alone_is_parse_failure() {
        let extractor = extractor(&[r"^\[(?<year>[^\]]+)\]$"]);
        let err = extractor.extract("[someday]").unwrap_err();
        assert_eq!(*err, ErrorKind::NoCaptures("[someday]".to_string()));
        assert_eq!(extractor.extract("[1999]").unwrap().year, Some(1999));
    }

    #[test]
    fn test_no_match_is_parse_failure() {
        let extractor = extractor(&[r"^(?<title>\d+)$"]);
        let err = extractor.extract("letters").unwrap_err();
        assert_eq!(*err, ErrorKind::NoMatch("letters".to_string()));
    }
}
