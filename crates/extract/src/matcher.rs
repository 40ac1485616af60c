//! Ordered filename rules.
//!
//! A [`PatternMatcher`] holds the user's regular expressions in the order they
//! were configured. Matching is **first success wins**: rules are tried top to
//! bottom and the first one that matches is used, even if a later rule would
//! capture more fields. Moving a rule up or down in the rule file therefore
//! changes behaviour, and the order must be preserved as written.

use crate::consts::COMMENT_MARKERS;
use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::instrument;

/// An ordered, deduplicated list of compiled filename rules.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Vec<Regex>,
}
impl PatternMatcher {
    /// Compiles the given rule lines.
    ///
    /// Blank lines and lines beginning with `# ` or `// ` are skipped. Exact
    /// duplicates are dropped, keeping the first occurrence (and therefore its
    /// position in the list).
    ///
    /// # Errors
    /// - [`ErrorKind::NoPatterns`] when nothing is left after filtering.
    /// - [`ErrorKind::InvalidPattern`] when a rule fails to compile.
    pub fn new<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut patterns = Vec::new();
        for line in lines {
            let line = line.as_ref();
            if is_ignored(line) || !seen.insert(line.to_string()) {
                continue;
            }
            patterns.push(Regex::new(line).or_raise(|| ErrorKind::InvalidPattern(line.to_string()))?);
        }
        if patterns.is_empty() {
            exn::bail!(ErrorKind::NoPatterns);
        }
        tracing::debug!(count = patterns.len(), "Compiled filename patterns");
        Ok(Self { patterns })
    }

    /// Returns the first rule (in configured order) that matches `filename`.
    #[instrument(level = "trace", skip(self))]
    pub fn find<'h>(&self, filename: &'h str) -> Option<PatternMatch<'_, 'h>> {
        self.patterns.iter().enumerate().find_map(|(index, regex)| {
            regex.captures(filename).map(|captures| PatternMatch { index, regex, captures })
        })
    }

    /// Same as [`find`](Self::find), but a miss is reported as
    /// [`ErrorKind::NoMatch`].
    pub fn require<'h>(&self, filename: &'h str) -> Result<PatternMatch<'_, 'h>> {
        self.find(filename).ok_or_else(|| Error::from(ErrorKind::NoMatch(filename.to_string())))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
impl FromStr for PatternMatcher {
    type Err = Error;

    /// Parses the contents of a rule file, one pattern per line.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s.lines().map(|line| line.trim_end_matches('\r')))
    }
}

fn is_ignored(line: &str) -> bool {
    line.trim().is_empty() || COMMENT_MARKERS.iter().any(|marker| line.starts_with(marker))
}

/// A successful match of one rule against one filename.
#[derive(Debug)]
pub struct PatternMatch<'r, 'h> {
    index: usize,
    regex: &'r Regex,
    captures: Captures<'h>,
}
impl<'r, 'h> PatternMatch<'r, 'h> {
    /// Position of the matching rule in the (filtered, deduplicated) rule list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The source text of the matching rule.
    pub fn pattern(&self) -> &'r str {
        self.regex.as_str()
    }

    /// The value captured by the named group, if that group took part in the
    /// match.
    pub fn group(&self, name: &str) -> Option<&'h str> {
        self.captures.name(name).map(|m| m.as_str())
    }

    /// All named groups that took part in the match, in rule order.
    pub fn groups(&self) -> impl Iterator<Item = (&'r str, &'h str)> + '_ {
        self.regex
            .capture_names()
            .flatten()
            .filter_map(|name| self.captures.name(name).map(|m| (name, m.as_str())))
    }
}
