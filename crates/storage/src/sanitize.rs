//! Filename sanitization.
//!
//! Every character that can't appear in a path or filename is replaced by a
//! single replacement character. The replacement itself is never an invalid
//! character, which makes sanitizing idempotent: running it twice gives the
//! same result as running it once.

pub const DEFAULT_REPLACEMENT: char = '_';

/// Characters rejected regardless of platform. Includes U+29F8 (big solidus),
/// which renders like a slash and confuses anyone reading a path.
const EXTRA_INVALID: [char; 7] = [':', '?', '/', '\u{29F8}', '"', '|', '*'];

#[cfg(windows)]
const PLATFORM_INVALID: &[char] = &['<', '>', '\\', ':', '"', '/', '|', '?', '*'];
#[cfg(not(windows))]
const PLATFORM_INVALID: &[char] = &['/'];

/// Returns `true` if `c` can't be used inside a file or directory name.
pub fn is_invalid(c: char) -> bool {
    c.is_control() || PLATFORM_INVALID.contains(&c) || EXTRA_INVALID.contains(&c)
}

/// Replaces invalid filename characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sanitizer {
    replacement: char,
}
impl Default for Sanitizer {
    fn default() -> Self {
        Self { replacement: DEFAULT_REPLACEMENT }
    }
}
impl Sanitizer {
    /// Uses `replacement` for invalid characters. An invalid replacement
    /// falls back to [`DEFAULT_REPLACEMENT`].
    pub fn new(replacement: char) -> Self {
        if is_invalid(replacement) {
            tracing::warn!(?replacement, "Replacement character is itself invalid; using '_'");
            return Self::default();
        }
        Self { replacement }
    }

    pub fn replacement(&self) -> char {
        self.replacement
    }

    pub fn sanitize(&self, s: &str) -> String {
        s.chars().map(|c| if is_invalid(c) { self.replacement } else { c }).collect()
    }
}

/// [`Sanitizer::sanitize`] with the default replacement.
pub fn sanitize(s: &str) -> String {
    Sanitizer::default().sanitize(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Plain Name", "Plain Name")]
    #[case("AC/DC", "AC_DC")]
    #[case("What?: \"Yes\" | No *", "What__ _Yes_ _ No _")]
    #[case("Big\u{29F8}Solidus", "Big_Solidus")]
    #[case("Tab\tNull\0", "Tab_Null_")]
    #[case("日本語 ＆ Ünïcödé", "日本語 ＆ Ünïcödé")]
    fn test_sanitize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize(input), expected);
    }

    #[rstest]
    #[case("AC/DC")]
    #[case("a:b?c/d\u{29F8}e\"f|g*h")]
    #[case("\u{1}\u{2}\u{7f}")]
    #[case("already_clean")]
    fn test_idempotent(#[case] input: &str) {
        let once = sanitize(input);
        assert_eq!(sanitize(&once), once);
        let dashes = Sanitizer::new('-');
        let once = dashes.sanitize(input);
        assert_eq!(dashes.sanitize(&once), once);
    }

    #[test]
    fn test_invalid_replacement_falls_back() {
        assert_eq!(Sanitizer::new('/').replacement(), DEFAULT_REPLACEMENT);
        assert_eq!(Sanitizer::new('-').sanitize("a/b"), "a-b");
    }
}
