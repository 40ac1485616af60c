//! Rename templates.
//!
//! A template is plain text with `%FIELD%` placeholders drawn from the
//! [`Field`] vocabulary:
//!
//! | Placeholder      | Value                                   |
//! |------------------|-----------------------------------------|
//! | `%ALBUMARTISTS%` | Album artists joined with `"; "`        |
//! | `%ARTISTS%`      | Track artists joined with `"; "`        |
//! | `%ALBUM%`        | Album name                              |
//! | `%TITLE%`        | Track title                             |
//! | `%YEAR%`         | Release year                            |
//! | `%TRACK%`        | Track number                            |
//!
//! A template only applies to an entity whose populated fields are *exactly*
//! the template's placeholders. When several templates apply, the last one in
//! the list wins.
//!
//! ```
//! use retag_extract::models::{FieldSet, MediaEntity};
//! use retag_library::RenamePattern;
//! use retag_storage::Sanitizer;
//!
//! let pattern: RenamePattern = "%ARTISTS% - %TITLE%".parse().unwrap();
//! let entity = MediaEntity {
//!     title: "What?".to_string(),
//!     artists: vec!["AC/DC".to_string()],
//!     ..MediaEntity::new("/music/track.mp3", 0)
//! };
//! assert!(pattern.applies_to(&FieldSet::populated(&entity)));
//! assert_eq!(pattern.render(&entity, &Sanitizer::default()).unwrap(), "AC_DC - What_.mp3");
//! ```

use crate::error::{Error, ErrorKind, Result};
use regex::{Captures, Regex};
use retag_extract::models::{Field, FieldSet, MediaEntity};
use retag_storage::Sanitizer;
use std::str::FromStr;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%([A-Za-z0-9_]+)%").unwrap());

/// A single rename template with its placeholder set resolved up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePattern {
    template: String,
    required: FieldSet,
    unknown: Vec<String>,
}
impl FromStr for RenamePattern {
    type Err = Error;

    /// Parses the placeholders of a template.
    ///
    /// Unknown placeholders don't fail here: they're logged as a warning and
    /// reported by [`render`](Self::render) instead, so one bad template in a
    /// list doesn't stop the others from loading.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let template = s.trim();
        if template.is_empty() {
            exn::bail!(ErrorKind::InvalidTemplate("template is empty".to_string()));
        }
        let mut required = FieldSet::default();
        let mut unknown: Vec<String> = Vec::new();
        for captures in PLACEHOLDER.captures_iter(template) {
            let name = &captures[1];
            match name.parse::<Field>() {
                Ok(field) => {
                    required.insert(field);
                },
                Err(_) if unknown.iter().any(|u| u == name) => {},
                Err(_) => unknown.push(name.to_string()),
            }
        }
        if !unknown.is_empty() {
            tracing::warn!(template, unknown = ?unknown, "Rename template contains unknown placeholders");
        }
        Ok(Self {
            template: template.to_string(),
            required,
            unknown,
        })
    }
}
impl RenamePattern {
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Fields that must be populated (and no others) for this template to
    /// apply.
    pub fn required(&self) -> &FieldSet {
        &self.required
    }

    /// `%TOKEN%`s that aren't part of the field vocabulary.
    pub fn unknown_placeholders(&self) -> &[String] {
        &self.unknown
    }

    pub fn applies_to(&self, fields: &FieldSet) -> bool {
        self.required == *fields
    }

    /// Renders the file name for `entity`: placeholders substituted with
    /// sanitized values, followed by the entity's current extension.
    ///
    /// Substitution is a single pass over the template, so a value that
    /// itself looks like a placeholder is kept as text.
    ///
    /// # Errors
    /// [`ErrorKind::UnknownPlaceholder`] if the template contains a token
    /// outside the field vocabulary.
    pub fn render(&self, entity: &MediaEntity, sanitizer: &Sanitizer) -> Result<String> {
        if let Some(name) = self.unknown.first() {
            exn::bail!(ErrorKind::UnknownPlaceholder(name.clone()));
        }
        let mut name = PLACEHOLDER
            .replace_all(&self.template, |captures: &Captures<'_>| match captures[1].parse::<Field>() {
                Ok(field) => sanitizer.sanitize(&field.value(entity)),
                Err(_) => captures[0].to_string(),
            })
            .into_owned();
        if let Some(extension) = entity.path.extension().and_then(|e| e.to_str()) {
            name.push('.');
            name.push_str(extension);
        }
        Ok(sanitizer.sanitize(&name))
    }
}

/// An ordered list of [`RenamePattern`]s.
#[derive(Debug, Clone, Default)]
pub struct RenamePatterns(Vec<RenamePattern>);
impl RenamePatterns {
    /// # Errors
    /// [`ErrorKind::InvalidTemplate`] if any template is empty, or the list
    /// itself is.
    pub fn new<I, S>(templates: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = templates.into_iter().map(|t| t.as_ref().parse()).collect::<Result<Vec<RenamePattern>>>()?;
        if patterns.is_empty() {
            exn::bail!(ErrorKind::InvalidTemplate("no rename templates configured".to_string()));
        }
        Ok(Self(patterns))
    }

    /// The last template whose placeholder set equals `fields`.
    pub fn select(&self, fields: &FieldSet) -> Option<&RenamePattern> {
        self.0.iter().rev().find(|pattern| pattern.applies_to(fields))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenamePattern> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
