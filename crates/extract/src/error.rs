//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The rule set was empty after removing comments and blank lines.
    #[display("no filename patterns configured")]
    NoPatterns,
    /// A rule could not be compiled into a regular expression.
    #[display("invalid filename pattern: {_0}")]
    InvalidPattern(#[error(not(source))] String),
    /// None of the configured rules matched the filename.
    #[display("no pattern matched filename: {_0}")]
    NoMatch(#[error(not(source))] String),
    /// A rule matched, but none of the recognized groups captured a value.
    #[display("pattern matched but captured no fields: {_0}")]
    NoCaptures(#[error(not(source))] String),
    /// A field name was not part of the placeholder vocabulary.
    #[display("unknown field: {_0}")]
    UnknownField(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Filenames and rules are fixed inputs; the same input always yields
        // the same outcome.
        false
    }

    /// Returns `true` for failures that only concern the one filename being
    /// parsed, rather than the rule set as a whole.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::NoMatch(_) | Self::NoCaptures(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::NoPatterns.to_string(), "no filename patterns configured");
        assert_eq!(ErrorKind::NoMatch("song".to_string()).to_string(), "no pattern matched filename: song");
    }

    #[test]
    fn parse_failures_are_per_file() {
        assert!(ErrorKind::NoMatch("a".to_string()).is_parse_failure());
        assert!(ErrorKind::NoCaptures("a".to_string()).is_parse_failure());
        assert!(!ErrorKind::NoPatterns.is_parse_failure());
        assert!(!ErrorKind::InvalidPattern("(".to_string()).is_parse_failure());
    }
}
